use crate::{
    error::{Disorder, Gap, SequenceError, SequenceErrorKind},
    version::Part,
    Version,
};
use core::cmp::Ordering;
use tracing::debug;

/// Compares one numeric part of two adjacent versions.
///
/// Returns `None` if the part is equal (so the next part should be checked). Otherwise the pair
/// is settled by this part, and the result says whether it was acceptable.
fn check_part(part: Part, prev: &Version, curr: &Version) -> Option<Result<(), SequenceErrorKind>> {
    let (p, c) = (prev.part(part), curr.part(part));
    match c.cmp(&p) {
        Ordering::Equal => None,
        Ordering::Less => Some(Err(SequenceErrorKind::OutOfOrder(Disorder::Part(part)))),
        Ordering::Greater if c - p != 1 => {
            Some(Err(SequenceErrorKind::Gap(Gap::GrewByMoreThanOne(part))))
        }
        Ordering::Greater => Some(
            match part.lesser().iter().find(|lesser| curr.part(**lesser) != 0) {
                Some(&non_zero) => Err(SequenceErrorKind::Gap(Gap::NotReset {
                    grown: part,
                    non_zero,
                })),
                None => Ok(()),
            },
        ),
    }
}

/// Returns the problem, if any, with `curr` directly following `prev`.
///
/// The numeric parts are checked most significant first and the first part that differs decides
/// the pair: it must have grown by exactly one with every lesser part reset to zero. If the
/// numeric parts are all equal, the pair must strictly increase in precedence (so the
/// pre-release identifiers decide).
pub fn check_pair(prev_index: usize, prev: &Version, curr: &Version) -> Option<SequenceError> {
    let kind = match Part::ALL
        .iter()
        .find_map(|&part| check_part(part, prev, curr))
    {
        Some(Ok(())) => return None,
        Some(Err(kind)) => kind,
        None => match curr.cmp_precedence(prev) {
            Ordering::Greater => return None,
            Ordering::Less => SequenceErrorKind::OutOfOrder(Disorder::PreRelease),
            Ordering::Equal => SequenceErrorKind::Duplicate,
        },
    };

    Some(SequenceError {
        prev_index,
        prev: prev.clone(),
        index: prev_index + 1,
        curr: curr.clone(),
        kind,
    })
}

/// Checks every adjacent pair in `versions`, in order, and returns one error per bad pair.
///
/// A bad pair never stops the scan.
///
/// # Examples
///
/// ```
/// use semverkit::prelude::*;
///
/// let versions: Vec<Version> = ["1.0.0", "1.0.1", "1.1.0", "2.0.0"]
///     .iter()
///     .map(|s| s.parse().unwrap())
///     .collect();
/// assert!(check_sequence(&versions).is_empty());
/// ```
pub fn check_sequence(versions: &[Version]) -> Vec<SequenceError> {
    versions
        .windows(2)
        .enumerate()
        .filter_map(|(prev_index, pair)| {
            let err = check_pair(prev_index, &pair[0], &pair[1])?;
            debug!(%err, "bad version sequence");
            Some(err)
        })
        .collect()
}
