//! Audio playback for synthesized replies
//!
//! The rodio output stream handle is not `Send`, so a worker thread owns
//! the device and receives clips over a channel. `Player::play` blocks its
//! caller until the clip has finished, which is what the voice loop needs
//! before it can re-listen.

use crate::{NatterError, Result};
use crossbeam_channel::{bounded, Receiver, Sender};
use std::io::Cursor;
use std::thread;
use tracing::debug;

/// Plays one audio clip to completion.
pub trait Player: Send {
    /// Blocks until the clip has finished playing, or fails.
    fn play(&mut self, audio: Vec<u8>) -> Result<()>;
}

enum PlaybackCommand {
    Play(Vec<u8>),
    Shutdown,
}

enum PlaybackEvent {
    Finished,
    Error(String),
}

/// rodio-backed player for encoded clips (wav, flac, vorbis, mp3)
pub struct RodioPlayer {
    command_tx: Sender<PlaybackCommand>,
    event_rx: Receiver<PlaybackEvent>,
}

impl RodioPlayer {
    /// Spawn the playback worker on the default output device.
    pub fn new() -> Result<Self> {
        let (command_tx, command_rx) = bounded::<PlaybackCommand>(4);
        let (event_tx, event_rx) = bounded::<PlaybackEvent>(4);
        let (ready_tx, ready_rx) = bounded::<std::result::Result<(), String>>(1);

        thread::spawn(move || {
            let (stream, handle) = match rodio::OutputStream::try_default() {
                Ok(pair) => {
                    let _ = ready_tx.send(Ok(()));
                    pair
                }
                Err(e) => {
                    let _ = ready_tx.send(Err(e.to_string()));
                    return;
                }
            };
            // The stream must outlive every sink attached to its handle.
            let _stream = stream;

            while let Ok(command) = command_rx.recv() {
                match command {
                    PlaybackCommand::Play(bytes) => {
                        let event = match play_clip(&handle, bytes) {
                            Ok(()) => PlaybackEvent::Finished,
                            Err(e) => PlaybackEvent::Error(e.to_string()),
                        };
                        if event_tx.send(event).is_err() {
                            break;
                        }
                    }
                    PlaybackCommand::Shutdown => break,
                }
            }

            debug!("playback worker stopped");
        });

        match ready_rx.recv() {
            Ok(Ok(())) => Ok(Self {
                command_tx,
                event_rx,
            }),
            Ok(Err(e)) => Err(NatterError::Playback(format!("no output device: {e}"))),
            Err(_) => Err(NatterError::Playback(
                "playback worker died during startup".to_string(),
            )),
        }
    }
}

fn play_clip(handle: &rodio::OutputStreamHandle, bytes: Vec<u8>) -> Result<()> {
    let source = rodio::Decoder::new(Cursor::new(bytes))
        .map_err(|e| NatterError::Playback(format!("undecodable audio: {e}")))?;
    let sink =
        rodio::Sink::try_new(handle).map_err(|e| NatterError::Playback(e.to_string()))?;

    sink.append(source);
    sink.sleep_until_end();
    Ok(())
}

impl Player for RodioPlayer {
    fn play(&mut self, audio: Vec<u8>) -> Result<()> {
        self.command_tx
            .send(PlaybackCommand::Play(audio))
            .map_err(|_| NatterError::Playback("playback worker is gone".to_string()))?;

        match self.event_rx.recv() {
            Ok(PlaybackEvent::Finished) => Ok(()),
            Ok(PlaybackEvent::Error(e)) => Err(NatterError::Playback(e)),
            Err(_) => Err(NatterError::Playback(
                "playback worker is gone".to_string(),
            )),
        }
    }
}

impl Drop for RodioPlayer {
    fn drop(&mut self) {
        let _ = self.command_tx.send(PlaybackCommand::Shutdown);
    }
}

/// Discards audio immediately. Used when no output device is present.
pub struct NullPlayer;

impl Player for NullPlayer {
    fn play(&mut self, _audio: Vec<u8>) -> Result<()> {
        Ok(())
    }
}
