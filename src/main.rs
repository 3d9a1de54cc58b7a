use anyhow::Result;
use crossbeam_channel::bounded;
use natter::backend::{HttpAssistantBackend, HttpSynthesizer};
use natter::controller::{ChannelView, Collaborators, ControllerConfig, ConversationController};
use natter::speech::{NullPlayer, Player, RecognitionCapability, RodioPlayer};
use natter::ui::NatterApp;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "natter=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Natter assistant chat");

    let config = ControllerConfig::default();

    let backend = HttpAssistantBackend::new(&config.backend)?;
    let synthesizer = HttpSynthesizer::new(&config.backend)?;

    let player: Box<dyn Player> = match RodioPlayer::new() {
        Ok(player) => Box::new(player),
        Err(e) => {
            warn!("audio output unavailable, replies will not be spoken: {e}");
            Box::new(NullPlayer)
        }
    };

    // No recognition engine ships with the desktop build; the voice
    // surfaces stay hidden until a capability is plugged in here.
    let (_recognition_tx, recognition_rx) = bounded(16);
    let recognition = RecognitionCapability::Unavailable;

    let (view_tx, view_rx) = bounded(256);

    let (controller, handle) = ConversationController::new(
        config,
        Collaborators {
            backend: Box::new(backend),
            synthesizer: Box::new(synthesizer),
            player,
            recognition,
            recognition_events: recognition_rx,
            view: Box::new(ChannelView::new(view_tx)),
        },
    )?;
    controller.start();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([480.0, 720.0])
            .with_min_inner_size([360.0, 480.0])
            .with_title("Natter"),
        ..Default::default()
    };

    eframe::run_native(
        "Natter",
        options,
        Box::new(move |cc| Ok(Box::new(NatterApp::new(cc, handle, view_rx)))),
    )
    .map_err(|e| anyhow::anyhow!("UI error: {e}"))?;

    Ok(())
}
