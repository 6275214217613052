use serde::{Deserialize, Serialize};

/// UI mode for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiMode {
    Normal,
    ChatInput,
    PlanInput,
    PlanReview,
    DiaryEditor,
    Flow,
}

/// Which list on the dashboard receives navigation keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusPane {
    Todos,
    Diaries,
}

impl FocusPane {
    pub fn toggle(self) -> Self {
        match self {
            Self::Todos => Self::Diaries,
            Self::Diaries => Self::Todos,
        }
    }
}

/// User input that counts as "still here" for the idle watchdog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityEvent {
    PointerDown,
    PointerMove,
    KeyPress,
    Scroll,
    /// Terminals never report touches
    #[allow(dead_code)]
    TouchStart,
}

/// Storage format of a diary document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DiaryFormat {
    #[default]
    Md,
    Txt,
    Docx,
}

impl DiaryFormat {
    /// Guess the format from a filename's extension
    pub fn from_filename(name: &str) -> Self {
        let lower = name.to_lowercase();
        if lower.ends_with(".docx") {
            Self::Docx
        } else if lower.ends_with(".txt") {
            Self::Txt
        } else {
            Self::Md
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_focus_pane_toggle() {
        assert_eq!(FocusPane::Todos.toggle(), FocusPane::Diaries);
        assert_eq!(FocusPane::Diaries.toggle(), FocusPane::Todos);
    }

    #[test]
    fn test_diary_format_from_filename() {
        assert_eq!(DiaryFormat::from_filename("2024-01-01.md"), DiaryFormat::Md);
        assert_eq!(DiaryFormat::from_filename("notes.TXT"), DiaryFormat::Txt);
        assert_eq!(DiaryFormat::from_filename("letter.docx"), DiaryFormat::Docx);
        assert_eq!(DiaryFormat::from_filename("untitled"), DiaryFormat::Md);
    }

    #[test]
    fn test_diary_format_serde() {
        assert_eq!(serde_json::to_string(&DiaryFormat::Docx).unwrap(), "\"docx\"");
        assert_eq!(serde_json::from_str::<DiaryFormat>("\"txt\"").unwrap(), DiaryFormat::Txt);
    }
}
