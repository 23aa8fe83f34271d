//! Candidate selection over paged record streams
//!
//! Selection is first-match-wins, stable by catalog order: records are
//! scanned in the order the pager yields them and the first one satisfying
//! the predicate is the candidate. There is no scoring or ranking, and
//! catalog order is treated as opaque. The positional path picks the Nth
//! record with no pattern test at all.
//!
//! All functions are pure transforms over their input stream; returning no
//! candidate is a normal outcome, not an error.

use futures::stream::{Stream, TryStreamExt};
use regex::Regex;

use crate::app::models::{NamedRecord, Video};
use crate::errors::ApiResult;

/// First record whose name field matches the regex (substring search)
pub async fn first_match<T, S>(records: S, pattern: &Regex) -> ApiResult<Option<T>>
where
    T: NamedRecord,
    S: Stream<Item = ApiResult<T>>,
{
    futures::pin_mut!(records);
    while let Some(record) = records.try_next().await? {
        if pattern.is_match(record.match_field()) {
            return Ok(Some(record));
        }
    }
    Ok(None)
}

/// The Nth record in scan order (0 = most recent), with no pattern test
pub async fn nth_record<T, S>(records: S, index: usize) -> ApiResult<Option<T>>
where
    S: Stream<Item = ApiResult<T>>,
{
    futures::pin_mut!(records);
    let mut remaining = index;
    while let Some(record) = records.try_next().await? {
        if remaining == 0 {
            return Ok(Some(record));
        }
        remaining -= 1;
    }
    Ok(None)
}

/// First video matching both its own name regex and its show's title regex
///
/// Used by the combined direct search, where no show filter narrows the
/// sequence; videos without show metadata never match.
pub async fn first_video_match<S>(
    records: S,
    video_pattern: &Regex,
    show_pattern: &Regex,
) -> ApiResult<Option<Video>>
where
    S: Stream<Item = ApiResult<Video>>,
{
    futures::pin_mut!(records);
    while let Some(video) = records.try_next().await? {
        let show_matches = video
            .show_title()
            .map_or(false, |title| show_pattern.is_match(title));
        if show_matches && video_pattern.is_match(video.match_field()) {
            return Ok(Some(video));
        }
    }
    Ok(None)
}
