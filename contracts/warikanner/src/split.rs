//! Even-split allocation with remainder distribution.
//!
//! Amounts are `u128` counts of the currency's minimal unit (1 yen, 1 wei,
//! 1 yoctoNEAR). The allocator never sees fractional amounts: callers that
//! hold a float or signed value convert it first with [`amount_from_f64`],
//! [`amount_from_i128`] or [`parse_amount`].

use std::collections::HashSet;

use near_sdk::serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, trace};

/// Largest integer an IEEE-754 double represents exactly.
const MAX_SAFE_FLOAT_INTEGER: f64 = 9_007_199_254_740_991.0;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SplitError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("At least one participant is required")]
    EmptyParticipantSet,

    #[error("Duplicate participant number {0}")]
    DuplicateParticipant(u32),

    #[error("Participant number must be at least 1")]
    InvalidParticipantNumber,
}

/// One party in a split.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(crate = "near_sdk::serde", rename_all = "camelCase")]
pub struct Participant {
    pub participant_number: u32,
    /// Absorbs indivisible remainder units.
    pub is_rounding: bool,
}

impl Participant {
    pub fn new(participant_number: u32, is_rounding: bool) -> Self {
        Self {
            participant_number,
            is_rounding,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SplitAmountResult {
    pub participant_number: u32,
    pub split_amount: u128,
}

/// Splits `total_amount` evenly across `participants`.
///
/// Every participant gets `total_amount / n`. The remainder is handed out one
/// unit at a time to the participants flagged `is_rounding`, in input order,
/// wrapping around them when there are more units than flagged participants.
/// When nobody is flagged the first participant absorbs the whole remainder.
///
/// Results are returned in input order and always sum to `total_amount`.
pub fn compute_split(
    total_amount: u128,
    participants: &[Participant],
) -> Result<Vec<SplitAmountResult>, SplitError> {
    validate_participants(participants)?;

    let count = participants.len() as u128;
    let base = total_amount / count;
    let remainder = total_amount % count;

    let mut eligible: Vec<usize> = participants
        .iter()
        .enumerate()
        .filter(|(_, p)| p.is_rounding)
        .map(|(idx, _)| idx)
        .collect();
    if eligible.is_empty() {
        if remainder > 0 {
            debug!(
                remainder,
                participant = participants[0].participant_number,
                "no rounding participant flagged, first participant absorbs remainder"
            );
        }
        eligible.push(0);
    }

    let mut shares = vec![base; participants.len()];
    let eligible_count = eligible.len() as u128;
    let units_each = remainder / eligible_count;
    let leftover = remainder % eligible_count;
    for (position, &idx) in eligible.iter().enumerate() {
        let extra = units_each + u128::from((position as u128) < leftover);
        shares[idx] += extra;
    }

    debug!(
        total_amount,
        participants = participants.len(),
        base,
        remainder,
        "computed split"
    );

    Ok(participants
        .iter()
        .zip(shares)
        .map(|(participant, split_amount)| {
            trace!(
                participant = participant.participant_number,
                split_amount,
                "share"
            );
            SplitAmountResult {
                participant_number: participant.participant_number,
                split_amount,
            }
        })
        .collect())
}

fn validate_participants(participants: &[Participant]) -> Result<(), SplitError> {
    if participants.is_empty() {
        return Err(SplitError::EmptyParticipantSet);
    }

    let mut seen: HashSet<u32> = HashSet::with_capacity(participants.len());
    for participant in participants {
        if participant.participant_number == 0 {
            return Err(SplitError::InvalidParticipantNumber);
        }
        if !seen.insert(participant.participant_number) {
            return Err(SplitError::DuplicateParticipant(
                participant.participant_number,
            ));
        }
    }
    Ok(())
}

/// Converts a UI-side number into minimal units.
///
/// Only whole, non-negative values up to 2^53 - 1 are accepted; anything
/// larger has already lost precision as a double.
pub fn amount_from_f64(value: f64) -> Result<u128, SplitError> {
    if !value.is_finite() {
        return Err(SplitError::InvalidAmount(format!("{value} is not finite")));
    }
    if value < 0.0 {
        return Err(SplitError::InvalidAmount(format!("{value} is negative")));
    }
    if value.fract() != 0.0 {
        return Err(SplitError::InvalidAmount(format!(
            "{value} is not a whole number of minimal units"
        )));
    }
    if value > MAX_SAFE_FLOAT_INTEGER {
        return Err(SplitError::InvalidAmount(format!(
            "{value} exceeds the exactly representable range"
        )));
    }
    Ok(value as u128)
}

pub fn amount_from_i128(value: i128) -> Result<u128, SplitError> {
    u128::try_from(value)
        .map_err(|_| SplitError::InvalidAmount(format!("{value} is negative")))
}

/// Parses a decimal integer string of minimal units.
pub fn parse_amount(text: &str) -> Result<u128, SplitError> {
    let trimmed = text.trim();
    if trimmed.starts_with('-') {
        return Err(SplitError::InvalidAmount(format!("{trimmed} is negative")));
    }
    trimmed
        .parse::<u128>()
        .map_err(|_| SplitError::InvalidAmount(format!("{trimmed:?} is not an integer amount")))
}
