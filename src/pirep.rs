//! Plain-English pilot report to coded PIREP line

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::generation::{GenerationRequest, ReportFieldBias, TextGenerator};
use crate::{BriefingError, Result};

pub struct PirepConverter {
    generator: Arc<dyn TextGenerator>,
}

impl PirepConverter {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Convert a free-text report into a single coded line
    #[instrument(skip(self, text), fields(chars = text.len()))]
    pub async fn convert(&self, text: &str, bias: Option<ReportFieldBias>) -> Result<String> {
        let text = text.trim();
        if text.is_empty() {
            return Err(BriefingError::validation(
                "Please paste a report in plain English.",
            ));
        }

        let prompt = pirep_prompt(text, Utc::now());
        let output = self
            .generator
            .generate(GenerationRequest::with_bias(prompt, bias))
            .await
            .map_err(|e| {
                BriefingError::generation(format!("Error converting to PIREP: {}", e.user_message()))
            })?;

        let line = first_line(&output).ok_or_else(|| {
            BriefingError::generation("Error converting to PIREP: the generator returned no report")
        })?;
        info!(report = %line, "Report converted");
        Ok(line)
    }
}

fn first_line(output: &str) -> Option<String> {
    output
        .lines()
        .map(|line| line.trim().trim_matches('`').trim())
        .find(|line| !line.is_empty())
        .map(str::to_string)
}

/// Conversion prompt; `now` fills the default `/TM` group
#[must_use]
pub fn pirep_prompt(text: &str, now: DateTime<Utc>) -> String {
    let time = now.format("%H%MZ");
    format!(
        r#"You are an expert in aviation communications. Translate the provided plain-English pilot report
into a single-line standardized PIREP string. Use only the information inferable from the text.
Omit fields that cannot be inferred.

Provided Text:
"""
{text}
"""

Current UTC time: {time}

Output rules:
1) Report type: 'UUA' for urgent hazards (severe turbulence/icing, LLWS, volcanic ash, hail, TS), else 'UA'.
2) Location: /OV [ICAO or relative]. If an airport name is clear, convert to ICAO.
3) Time: /TM [HHMMZ]. Use {time} unless a precise time is clearly given.
4) Altitude: /FL [hundreds of feet, 3 digits].
5) Aircraft: /TP [standard code] if inferable.
6) Sky cover: /SK [codes+alt] (e.g., BKN080, SCT030, CB) if inferable.
7) Weather: /WX [codes] (e.g., RA, BR, +SHRA, LTG) if inferable.
8) Temperature: /TA [C], with M for negative (e.g., M02), if inferable.
9) Turbulence: /TB [intensity/type] if inferable.
10) Icing: /IC [intensity/type] if inferable.

Output a SINGLE LINE with only the coded PIREP segments separated by spaces, no extra commentary.
Example: UUA /OV VIDP /TM {time} /FL080 /TP C172 /SK BKN080 /WX BR /TB LGT CHOP /IC NEG
"#
    )
}
