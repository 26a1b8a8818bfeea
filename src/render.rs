// 🖨️ Record Rendering - DisplayRecord → text line + tone
// Shared by the console, the TUI and the JSON server.

use serde::Serialize;

use crate::forecast::DisplayRecord;

/// Width of the dashed line between area forecasts
const SEPARATOR_WIDTH: usize = 50;

// ============================================================================
// TONE
// ============================================================================

/// Semantic color of a rendered line. Renderers map it to their own palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Accent,
    AccentSecondary,
    Text,
    TextSecondary,
    Border,
    Error,
}

impl Tone {
    /// Terminal-green palette
    pub fn hex(&self) -> &'static str {
        match self {
            Tone::Accent => "#00ffff",
            Tone::AccentSecondary => "#00ff88",
            Tone::Text => "#00ff00",
            Tone::TextSecondary => "#00ffff",
            Tone::Border => "#00ffff",
            Tone::Error => "#ff0066",
        }
    }

    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            Tone::Accent | Tone::TextSecondary | Tone::Border => (0x00, 0xff, 0xff),
            Tone::AccentSecondary => (0x00, 0xff, 0x88),
            Tone::Text => (0x00, 0xff, 0x00),
            Tone::Error => (0xff, 0x00, 0x66),
        }
    }
}

// ============================================================================
// LINES
// ============================================================================

impl DisplayRecord {
    /// Text of this record as one console line
    pub fn line(&self) -> String {
        match self {
            DisplayRecord::AreaHeader { name } => format!(">> {} <<", name),
            DisplayRecord::Timestamp { raw } => format!("[TIME] {}", raw),
            DisplayRecord::ForecastLine { area_name } => format!("[FORECAST] {}", area_name),
            DisplayRecord::DayLine {
                day_index,
                date_short,
                weather_text,
                code,
            } => format!(
                "  [{:<6}] {} | {:<20} [CODE:{}]",
                format!("DAY {}", day_index),
                date_short,
                weather_text,
                code
            ),
            DisplayRecord::TempLine { values } => format!("  [TEMP] {}", values),
            DisplayRecord::WindLine { values } => format!("  [WIND] {}", values),
            DisplayRecord::WaveLine { values } => format!("  [WAVE] {}", values),
            DisplayRecord::Separator => "-".repeat(SEPARATOR_WIDTH),
            DisplayRecord::Empty => "[WARNING] NO DISPLAYABLE DATA".to_string(),
            DisplayRecord::NoData => "[ERROR] NO DATA AVAILABLE".to_string(),
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            DisplayRecord::AreaHeader { .. } => Tone::Accent,
            DisplayRecord::Timestamp { .. } | DisplayRecord::TempLine { .. } => Tone::TextSecondary,
            DisplayRecord::ForecastLine { .. } => Tone::AccentSecondary,
            DisplayRecord::DayLine { .. }
            | DisplayRecord::WindLine { .. }
            | DisplayRecord::WaveLine { .. } => Tone::Text,
            DisplayRecord::Separator => Tone::Border,
            DisplayRecord::Empty | DisplayRecord::NoData => Tone::Error,
        }
    }

    /// Headers are drawn bold
    pub fn is_heading(&self) -> bool {
        matches!(
            self,
            DisplayRecord::AreaHeader { .. } | DisplayRecord::ForecastLine { .. }
        )
    }
}

/// A record rendered for transport (server responses)
#[derive(Debug, Clone, Serialize)]
pub struct RenderedLine {
    pub text: String,
    pub tone: Tone,
}

impl From<&DisplayRecord> for RenderedLine {
    fn from(record: &DisplayRecord) -> Self {
        RenderedLine {
            text: record.line(),
            tone: record.tone(),
        }
    }
}

/// Render every record as a console line
pub fn render_lines(records: &[DisplayRecord]) -> Vec<String> {
    records.iter().map(DisplayRecord::line).collect()
}

// ============================================================================
// TESTS
// ============================================================================
