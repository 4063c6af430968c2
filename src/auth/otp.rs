//! Verification code entry and the resend cooldown timer.
//!
//! The verification screen owns one [`OtpInput`] and one [`OtpTimer`].
//! Both live exactly as long as the screen: leaving it drops them, and
//! returning starts over with a fresh code entry and a full cooldown.

use crate::errors::ValidationError;
use std::fmt;

/// Number of digits in a verification code.
pub const OTP_LEN: usize = 6;

/// Seconds a user must wait before requesting another code.
pub const RESEND_COOLDOWN_SECS: u32 = 180;

/// A syntactically valid verification code: exactly six ASCII digits.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OtpCode(String);

impl OtpCode {
    /// Parse raw input into a code, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Fails with the screen's message when the input is not exactly six
    /// digits.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.len() == OTP_LEN && trimmed.chars().all(|c| c.is_ascii_digit()) {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(ValidationError::new("otp", "OTP must be 6 digits"))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Six single-character entry slots for the verification screen.
///
/// Digits fill left to right, backspace clears right to left, and a paste
/// of exactly six digits fills the whole row at once. Submission requires
/// all six slots.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OtpInput {
    slots: [Option<char>; OTP_LEN],
}

impl OtpInput {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill the next empty slot. Non-digits and input past the last slot
    /// are ignored.
    pub fn push(&mut self, c: char) -> bool {
        if !c.is_ascii_digit() {
            return false;
        }
        match self.slots.iter_mut().find(|slot| slot.is_none()) {
            Some(slot) => {
                *slot = Some(c);
                true
            }
            None => false,
        }
    }

    /// Clear the last filled slot. No-op when the row is empty.
    pub fn backspace(&mut self) -> bool {
        match self.slots.iter_mut().rev().find(|slot| slot.is_some()) {
            Some(slot) => {
                *slot = None;
                true
            }
            None => false,
        }
    }

    /// Fill the whole row from a paste of exactly six digits. Only accepted
    /// while the row is still empty.
    pub fn paste(&mut self, raw: &str) -> bool {
        if !self.is_empty() {
            return false;
        }
        let trimmed = raw.trim();
        if trimmed.len() != OTP_LEN || !trimmed.chars().all(|c| c.is_ascii_digit()) {
            return false;
        }
        for (slot, c) in self.slots.iter_mut().zip(trimmed.chars()) {
            *slot = Some(c);
        }
        true
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// The entered code, once all six slots are filled.
    #[must_use]
    pub fn code(&self) -> Option<OtpCode> {
        if !self.is_complete() {
            return None;
        }
        Some(OtpCode(self.slots.iter().flatten().collect()))
    }

    /// Row as shown on the verification screen, one character per slot.
    #[must_use]
    pub fn render(&self) -> String {
        self.slots
            .iter()
            .map(|slot| slot.unwrap_or('_').to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Resend cooldown. Starts at [`RESEND_COOLDOWN_SECS`] with resend locked;
/// each tick takes one second off, and resend unlocks exactly when the
/// counter reaches zero. Ticking at zero changes nothing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OtpTimer {
    seconds_remaining: u32,
    can_resend: bool,
}

impl Default for OtpTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl OtpTimer {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            seconds_remaining: RESEND_COOLDOWN_SECS,
            can_resend: false,
        }
    }

    /// One second elapsed.
    pub fn tick(&mut self) {
        if self.seconds_remaining > 0 {
            self.seconds_remaining -= 1;
            if self.seconds_remaining == 0 {
                self.can_resend = true;
            }
        }
    }

    #[must_use]
    pub const fn seconds_remaining(&self) -> u32 {
        self.seconds_remaining
    }

    #[must_use]
    pub const fn can_resend(&self) -> bool {
        self.can_resend
    }

    /// Restart the cooldown after a resend was dispatched. Refuses while
    /// resend is still locked, so a caller cannot shorten the wait.
    pub fn try_rearm(&mut self) -> bool {
        if !self.can_resend {
            return false;
        }
        *self = Self::new();
        true
    }
}

impl fmt::Display for OtpTimer {
    /// Zero-padded `MM:SS`, the exact text the verification screen shows.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let minutes = self.seconds_remaining / 60;
        let seconds = self.seconds_remaining % 60;
        write!(f, "{minutes:02}:{seconds:02}")
    }
}
