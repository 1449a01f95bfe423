//! Normalizing keyboard input into chain commands.
//!
//! Every accepted keystroke maps to exactly one command; nothing is queued or
//! debounced.

use alloc::string::ToString;

use crate::error::WormError;

/// What a keystroke asks the chain builder to do.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Append this character to the active chain.
    Letter(char),
    /// Sever the active chain. Carries the key that triggered it.
    Break(char),
}

impl Command {
    /// Parse a physical keyboard key name (the DOM `KeyboardEvent.key` value).
    ///
    /// Space and `Enter` break; a single displayable character is a letter. Other
    /// named keys such as `Shift` or `ArrowLeft` are ignored with `Ok(None)`.
    pub fn from_key(key: &str) -> Result<Option<Command>, WormError> {
        match key {
            " " => Ok(Some(Command::Break(' '))),
            "Enter" => Ok(Some(Command::Break('\n'))),
            _ => match single_char(key) {
                Some(c) => Self::letter(c).map(Some),
                None => Ok(None),
            },
        }
    }

    /// Parse a tap on the on-screen keyboard, whose shift state is already resolved.
    ///
    /// Space and `ENTER` break; a single displayable character is a letter; any
    /// other token is rejected.
    pub fn from_virtual_key(key: &str) -> Result<Command, WormError> {
        match key {
            " " => Ok(Command::Break(' ')),
            "ENTER" => Ok(Command::Break('\n')),
            _ => match single_char(key) {
                Some(c) => Self::letter(c),
                None => Err(WormError::InvalidInput(key.to_string())),
            },
        }
    }

    /// Classify one already-resolved character.
    pub fn from_char(c: char) -> Result<Command, WormError> {
        match c {
            ' ' | '\n' | '\r' => Ok(Command::Break(c)),
            _ => Self::letter(c),
        }
    }

    fn letter(c: char) -> Result<Command, WormError> {
        if c.is_control() || c.is_whitespace() {
            return Err(WormError::InvalidInput(c.to_string()));
        }
        Ok(Command::Letter(c))
    }

    /// The character a host appends to its transcript for this command.
    pub fn literal(self) -> char {
        match self {
            Command::Letter(c) | Command::Break(c) => c,
        }
    }

    pub fn is_break(self) -> bool {
        matches!(self, Command::Break(_))
    }
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    let c = chars.next()?;
    chars.next().is_none().then_some(c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn space_and_enter_break() {
        assert_eq!(Command::from_key(" "), Ok(Some(Command::Break(' '))));
        assert_eq!(Command::from_key("Enter"), Ok(Some(Command::Break('\n'))));
        assert_eq!(Command::from_virtual_key("ENTER"), Ok(Command::Break('\n')));
    }

    #[test]
    fn named_keys_are_ignored() {
        assert_eq!(Command::from_key("Shift"), Ok(None));
        assert_eq!(Command::from_key("ArrowLeft"), Ok(None));
    }

    #[test]
    fn unicode_letters_are_single_chars() {
        assert_eq!(Command::from_key("é"), Ok(Some(Command::Letter('é'))));
        assert_eq!(Command::from_virtual_key("!"), Ok(Command::Letter('!')));
    }

    #[test]
    fn control_and_multi_char_tokens_are_rejected() {
        assert!(Command::from_key("\t").is_err());
        assert!(Command::from_virtual_key("SHIFT").is_err());
        assert!(Command::from_virtual_key("").is_err());
        assert!(Command::from_char('\u{7}').is_err());
    }

    #[test]
    fn literal_round_trips_the_key() {
        assert_eq!(Command::from_virtual_key("Q").unwrap().literal(), 'Q');
        assert!(Command::from_char(' ').unwrap().is_break());
    }
}
