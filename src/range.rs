use crate::error::ReportError;
use chrono::NaiveDate;

/// The format users give dates in on the command line.
const INPUT_FORMAT: &str = "%m/%d/%Y";

/// An inclusive range of calendar days to ask for completed items over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub since: NaiveDate,
    pub until: NaiveDate,
}
impl DateRange {
    /// Parses the two `MM/DD/YYYY` dates from the command line. Both must be present, and `until`
    /// may not fall before `since` (they can be the same day).
    pub fn parse(since: &str, until: &str) -> Result<Self, ReportError> {
        let since = parse_date("SinceDate", since)?;
        let until = parse_date("UntilDate", until)?;
        if until < since {
            return Err(ReportError::Parse(format!(
                "`UntilDate` ({until}) must not be before `SinceDate` ({since})"
            )));
        }

        Ok(Self { since, until })
    }

    /// The lower boundary as the service expects it, at the very start of the first day.
    pub fn since_param(&self) -> String {
        self.since.format("%Y-%m-%dT00:00").to_string()
    }

    /// The upper boundary, pinned to the last minute of the final day.
    pub fn until_param(&self) -> String {
        self.until.format("%Y-%m-%dT23:59").to_string()
    }
}

fn parse_date(flag: &str, input: &str) -> Result<NaiveDate, ReportError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ReportError::Parse(format!(
            "`{flag}` is required (format MM/DD/YYYY)"
        )));
    }

    // chrono accepts unpadded fields and signed years, so check the literal layout first
    if !has_input_layout(input) {
        return Err(ReportError::Parse(format!(
            "`{flag}` value \"{input}\" is not a MM/DD/YYYY date"
        )));
    }

    NaiveDate::parse_from_str(input, INPUT_FORMAT).map_err(|err| {
        ReportError::Parse(format!(
            "`{flag}` value \"{input}\" is not a MM/DD/YYYY date ({err})"
        ))
    })
}

/// Whether the input is exactly `DD/DD/DDDD`.
fn has_input_layout(input: &str) -> bool {
    let bytes = input.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(idx, b)| match idx {
            2 | 5 => *b == b'/',
            _ => b.is_ascii_digit(),
        })
}
