//! Multi-modal capture - audio/image attachment lifecycle
//!
//! A capture session holds at most one audio and one image attachment.
//! Selecting a file or finishing a recording replaces the previous
//! attachment of that modality; nothing ever appends.

use crate::error::{Result, SessionError};
use tracing::debug;

/// A captured artifact ready to upload
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    pub fn new(
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Build an attachment guessing the mime type from the file extension
    pub fn from_file_bytes(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let mime_type = guess_mime(&file_name).to_string();
        Self {
            file_name,
            mime_type,
            bytes,
        }
    }
}

fn guess_mime(file_name: &str) -> &'static str {
    let ext = file_name.rsplit('.').next().unwrap_or("").to_lowercase();
    match ext.as_str() {
        "wav" => "audio/wav",
        "mp3" => "audio/mpeg",
        "ogg" => "audio/ogg",
        "m4a" => "audio/mp4",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

/// An exclusive audio-input device.
///
/// `start` acquires the device (failing with a device/permission message
/// when none is available); `stop` finalizes the capture and releases the
/// device; `cancel` releases it without producing an artifact. Implementors
/// must release on every path out of `stop`, success or not.
pub trait AudioInput {
    fn start(&mut self) -> std::result::Result<(), String>;
    fn stop(&mut self) -> std::result::Result<Vec<u8>, String>;
    fn cancel(&mut self);
}

/// Mutable capture state, owned exclusively by the controller
#[derive(Debug, Clone, Default)]
pub struct CaptureSession {
    pub audio: Option<Attachment>,
    pub image: Option<Attachment>,
    pub recording_active: bool,
}

impl CaptureSession {
    /// How many modalities (audio, image) currently carry an attachment
    pub fn modality_count(&self) -> usize {
        usize::from(self.audio.is_some()) + usize::from(self.image.is_some())
    }
}

/// Manages the attachment lifecycle over an audio-input device
pub struct CaptureController<A: AudioInput> {
    session: CaptureSession,
    input: A,
}

impl<A: AudioInput> CaptureController<A> {
    pub fn new(input: A) -> Self {
        Self {
            session: CaptureSession::default(),
            input,
        }
    }

    pub fn session(&self) -> &CaptureSession {
        &self.session
    }

    /// Attach an audio file, replacing any prior audio attachment.
    /// An in-progress recording is cancelled first.
    pub fn select_audio_file(&mut self, attachment: Attachment) {
        self.cancel_recording();
        debug!("Selected audio file: {}", attachment.file_name);
        self.session.audio = Some(attachment);
    }

    /// Attach an image file, replacing any prior image attachment
    pub fn select_image_file(&mut self, attachment: Attachment) {
        debug!("Selected image file: {}", attachment.file_name);
        self.session.image = Some(attachment);
    }

    /// Acquire the microphone and begin recording
    pub fn start_recording(&mut self) -> Result<()> {
        if self.session.recording_active {
            return Err(SessionError::Validation(
                "a recording is already in progress".into(),
            ));
        }
        self.input
            .start()
            .map_err(SessionError::ResourceUnavailable)?;
        self.session.recording_active = true;
        Ok(())
    }

    /// Finish recording, replacing any prior audio attachment with the
    /// captured artifact. The device is released whether or not capture
    /// succeeded. A no-op when nothing is recording.
    pub fn stop_recording(&mut self) -> Result<()> {
        if !self.session.recording_active {
            return Ok(());
        }
        self.session.recording_active = false;

        let bytes = self
            .input
            .stop()
            .map_err(SessionError::ResourceUnavailable)?;

        debug!("Finalized recording ({} bytes)", bytes.len());
        self.session.audio = Some(Attachment::new("recording.wav", "audio/wav", bytes));
        Ok(())
    }

    /// Release all attachments, preview state, and any active recording
    pub fn clear(&mut self) {
        self.cancel_recording();
        self.session.audio = None;
        self.session.image = None;
    }

    /// Take the attachments out of the session, leaving it empty
    pub fn take_attachments(&mut self) -> (Option<Attachment>, Option<Attachment>) {
        self.cancel_recording();
        (self.session.audio.take(), self.session.image.take())
    }

    fn cancel_recording(&mut self) {
        if self.session.recording_active {
            self.input.cancel();
            self.session.recording_active = false;
        }
    }
}

impl<A: AudioInput> Drop for CaptureController<A> {
    fn drop(&mut self) {
        // Session teardown must not leave the microphone held
        self.cancel_recording();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Microphone fake that tracks whether the device is held
    struct FakeMicrophone {
        held: Rc<Cell<bool>>,
        available: bool,
    }

    impl FakeMicrophone {
        fn new(available: bool) -> (Self, Rc<Cell<bool>>) {
            let held = Rc::new(Cell::new(false));
            (
                Self {
                    held: held.clone(),
                    available,
                },
                held,
            )
        }
    }

    impl AudioInput for FakeMicrophone {
        fn start(&mut self) -> std::result::Result<(), String> {
            if !self.available {
                return Err("microphone permission denied".into());
            }
            self.held.set(true);
            Ok(())
        }

        fn stop(&mut self) -> std::result::Result<Vec<u8>, String> {
            self.held.set(false);
            Ok(vec![1, 2, 3])
        }

        fn cancel(&mut self) {
            self.held.set(false);
        }
    }

    fn audio(name: &str) -> Attachment {
        Attachment::from_file_bytes(name, vec![0])
    }

    #[test]
    fn test_select_replaces_attachment() {
        let (mic, _) = FakeMicrophone::new(true);
        let mut controller = CaptureController::new(mic);

        controller.select_audio_file(audio("a.wav"));
        controller.select_audio_file(audio("b.wav"));

        assert_eq!(controller.session().audio.as_ref().unwrap().file_name, "b.wav");
        assert_eq!(controller.session().modality_count(), 1);
    }

    #[test]
    fn test_clear_releases_everything() {
        let (mic, held) = FakeMicrophone::new(true);
        let mut controller = CaptureController::new(mic);

        controller.select_audio_file(audio("a.wav"));
        controller.select_image_file(Attachment::from_file_bytes("art.png", vec![9]));
        controller.start_recording().unwrap();
        controller.clear();

        assert!(controller.session().audio.is_none());
        assert!(controller.session().image.is_none());
        assert!(!controller.session().recording_active);
        assert!(!held.get());
    }

    #[test]
    fn test_recording_produces_attachment_and_releases_device() {
        let (mic, held) = FakeMicrophone::new(true);
        let mut controller = CaptureController::new(mic);

        controller.start_recording().unwrap();
        assert!(held.get());
        assert!(controller.session().recording_active);

        controller.stop_recording().unwrap();
        assert!(!held.get());

        let attachment = controller.session().audio.as_ref().unwrap();
        assert_eq!(attachment.file_name, "recording.wav");
        assert_eq!(attachment.bytes, vec![1, 2, 3]);
    }

    #[test]
    fn test_recording_replaces_selected_file() {
        let (mic, _) = FakeMicrophone::new(true);
        let mut controller = CaptureController::new(mic);

        controller.select_audio_file(audio("old.wav"));
        controller.start_recording().unwrap();
        controller.stop_recording().unwrap();

        assert_eq!(
            controller.session().audio.as_ref().unwrap().file_name,
            "recording.wav"
        );
    }

    #[test]
    fn test_unavailable_device_surfaces_error() {
        let (mic, held) = FakeMicrophone::new(false);
        let mut controller = CaptureController::new(mic);

        let err = controller.start_recording().unwrap_err();
        assert!(matches!(err, SessionError::ResourceUnavailable(_)));
        assert!(!controller.session().recording_active);
        assert!(!held.get());
    }

    #[test]
    fn test_double_start_rejected() {
        let (mic, _) = FakeMicrophone::new(true);
        let mut controller = CaptureController::new(mic);

        controller.start_recording().unwrap();
        assert!(controller.start_recording().is_err());
    }

    #[test]
    fn test_drop_releases_active_recording() {
        let (mic, held) = FakeMicrophone::new(true);
        {
            let mut controller = CaptureController::new(mic);
            controller.start_recording().unwrap();
            assert!(held.get());
        }
        assert!(!held.get());
    }

    #[test]
    fn test_mime_guessing() {
        assert_eq!(guess_mime("song.WAV"), "audio/wav");
        assert_eq!(guess_mime("mask.jpeg"), "image/jpeg");
        assert_eq!(guess_mime("unknown"), "application/octet-stream");
    }
}
