/// Redacts sensitive values out of a logged request/response transcript.
///
/// Implementations are pure: scrubbing an already scrubbed transcript returns it unchanged, and
/// bytes outside the sensitive values are never touched.
pub trait TranscriptScrubber {
    fn supports_scrubbing(&self) -> bool {
        true
    }

    fn scrub(&self, transcript: &str) -> String;
}
