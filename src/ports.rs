//! Typed input ports.
//!
//! Digits reach a match over two distinct channels: the shared group
//! port, where the striker plays 0-6 in front of everyone, and the
//! private port, where the bowler calls 1-6 in secret. Splitting a
//! [`MatchHandle`] into two port values makes the separation structural:
//! a consumer holding only the group port cannot inject a bowl, whatever
//! it sends.
//!
//! Ports also absorb chatter. Group chats carry arbitrary text; anything
//! that is not a single digit in the port's domain is dropped here
//! without bothering the actor.

use crate::engine::machine::MatchHandle;
use crate::engine::types::PlayerId;
use crate::error::EngineError;

/// The shared port: strikers play their numbers here, in the open.
#[derive(Debug, Clone)]
pub struct GroupPort {
    handle: MatchHandle,
}

/// The private port: bowlers call their numbers here, unseen.
#[derive(Debug, Clone)]
pub struct PrivatePort {
    handle: MatchHandle,
}

/// Splits a match handle into its two input ports.
#[must_use]
pub fn split(handle: &MatchHandle) -> (GroupPort, PrivatePort) {
    (
        GroupPort {
            handle: handle.clone(),
        },
        PrivatePort {
            handle: handle.clone(),
        },
    )
}

impl GroupPort {
    /// Offers a raw group message. Forwards it when it is a bare digit
    /// 0-6, drops it as chatter otherwise.
    ///
    /// Returns whether the message was forwarded.
    ///
    /// # Errors
    ///
    /// [`EngineError::NoActiveMatch`] when the match actor is gone.
    pub async fn submit(&self, sender: PlayerId, text: &str) -> Result<bool, EngineError> {
        match parse_digit(text, 0) {
            Some(digit) => {
                self.handle.group_digit(sender, digit).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

impl PrivatePort {
    /// Offers a raw private message. Forwards it when it is a bare digit
    /// 1-6, drops it otherwise.
    ///
    /// Returns whether the message was forwarded.
    ///
    /// # Errors
    ///
    /// [`EngineError::NoActiveMatch`] when the match actor is gone.
    pub async fn submit(&self, sender: PlayerId, text: &str) -> Result<bool, EngineError> {
        match parse_digit(text, 1) {
            Some(digit) => {
                self.handle.private_digit(sender, digit).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// Accepts exactly one digit between `min` and 6, surrounded by nothing
/// but whitespace.
fn parse_digit(text: &str, min: u8) -> Option<u8> {
    let trimmed = text.trim();
    let mut chars = trimmed.chars();
    let first = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    let digit = u8::try_from(first.to_digit(10)?).ok()?;
    (min..=6).contains(&digit).then_some(digit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_domain_is_zero_to_six() {
        assert_eq!(parse_digit("0", 0), Some(0));
        assert_eq!(parse_digit(" 6 ", 0), Some(6));
        assert_eq!(parse_digit("7", 0), None);
        assert_eq!(parse_digit("42", 0), None);
        assert_eq!(parse_digit("four", 0), None);
        assert_eq!(parse_digit("", 0), None);
    }

    #[test]
    fn private_domain_is_one_to_six() {
        assert_eq!(parse_digit("0", 1), None);
        assert_eq!(parse_digit("1", 1), Some(1));
        assert_eq!(parse_digit("6", 1), Some(6));
    }

    #[test]
    fn non_ascii_chatter_is_dropped() {
        assert_eq!(parse_digit("٤", 0), None);
        assert_eq!(parse_digit("6!", 0), None);
    }
}
