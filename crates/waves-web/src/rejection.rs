//! Sorting `play()` promise rejections into real failures and interruptions.

/// Outcome of a rejected `play()` request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlayRejection {
    /// A later `pause()` or source change cut the request short.
    Interrupted,
    /// The element could not play (autoplay policy, unsupported source).
    Failed(String),
}

impl PlayRejection {
    /// Classify by `DOMException.name` and message.
    pub fn classify(name: &str, message: &str) -> Self {
        if name == "AbortError" {
            return Self::Interrupted;
        }
        let reason = match (name.is_empty(), message.is_empty()) {
            (true, true) => "unknown error".to_owned(),
            (true, false) => message.to_owned(),
            (false, true) => name.to_owned(),
            (false, false) => format!("{name}: {message}"),
        };
        Self::Failed(reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abort_is_an_interruption() {
        assert_eq!(
            PlayRejection::classify(
                "AbortError",
                "The play() request was interrupted by a call to pause()."
            ),
            PlayRejection::Interrupted
        );
    }

    #[test]
    fn policy_rejection_keeps_the_message() {
        assert_eq!(
            PlayRejection::classify("NotAllowedError", "play() failed because the user didn't interact"),
            PlayRejection::Failed(
                "NotAllowedError: play() failed because the user didn't interact".into()
            )
        );
        assert_eq!(
            PlayRejection::classify("NotSupportedError", ""),
            PlayRejection::Failed("NotSupportedError".into())
        );
        assert_eq!(
            PlayRejection::classify("", ""),
            PlayRejection::Failed("unknown error".into())
        );
    }
}
