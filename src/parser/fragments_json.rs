//! Fragment input from JSON, for pipelines that extract text elsewhere.
//!
//! Accepts either a bare array of fragment records or an object with
//! `fragments` and optional `pages` (page frames).

use serde::Deserialize;
use serde_json::Value;

use crate::error::{Result, Warning};
use crate::model::{PageFrame, TextFragment};

/// Fragments read from JSON, with a warning for every record that was
/// dropped.
#[derive(Debug, Clone, Default)]
pub struct FragmentInput {
    /// Usable fragment records, in input order
    pub fragments: Vec<TextFragment>,
    /// Page frames, if the input carried any
    pub frames: Vec<PageFrame>,
    /// One entry per dropped record
    pub warnings: Vec<Warning>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FragmentFile {
    Bare(Vec<Value>),
    Wrapped {
        fragments: Vec<Value>,
        #[serde(default)]
        pages: Vec<PageFrame>,
    },
}

/// Parse fragment JSON.
///
/// Invalid JSON (or the wrong top-level shape) is an error; individual
/// records missing required fields are skipped and reported as
/// [`Warning::MalformedFragment`].
pub fn parse_fragments_json(input: &str) -> Result<FragmentInput> {
    let (records, frames) = match serde_json::from_str::<FragmentFile>(input)? {
        FragmentFile::Bare(records) => (records, Vec::new()),
        FragmentFile::Wrapped { fragments, pages } => (fragments, pages),
    };

    let mut parsed = FragmentInput {
        frames,
        ..Default::default()
    };

    for (index, record) in records.into_iter().enumerate() {
        match serde_json::from_value::<TextFragment>(record) {
            Ok(fragment) => parsed.fragments.push(fragment),
            Err(e) => {
                log::warn!("Skipping fragment record #{}: {}", index, e);
                parsed.warnings.push(Warning::MalformedFragment {
                    index,
                    reason: e.to_string(),
                });
            }
        }
    }

    Ok(parsed)
}
