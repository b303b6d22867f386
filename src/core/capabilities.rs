// Native Editor Capabilities
// Decides whether color/date/time controls get their native editors or degrade to text

use super::control::ControlKind;

/// Colours needed before the color editor can show a faithful swatch
const MIN_SWATCH_COLORS: u16 = 256;

/// Which native editors the host terminal honours
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub native_color: bool,
    pub native_date: bool,
    pub native_time: bool,
}

impl Capabilities {
    /// Probe the running terminal
    /// The color editor renders RGB swatches, so it needs a terminal that reports at least
    /// 256 colours; date and time editors are plain cell editors and always work.
    pub fn probe() -> Self {
        let colors = crossterm::style::available_color_count();
        Self {
            native_color: colors >= MIN_SWATCH_COLORS,
            native_date: true,
            native_time: true,
        }
    }

    /// Every native editor available
    pub fn all() -> Self {
        Self {
            native_color: true,
            native_date: true,
            native_time: true,
        }
    }

    /// Every special editor degraded to text
    pub fn plain() -> Self {
        Self {
            native_color: false,
            native_date: false,
            native_time: false,
        }
    }

    /// Whether `kind` keeps its native editor
    pub fn honors(&self, kind: ControlKind) -> bool {
        match kind {
            ControlKind::Color => self.native_color,
            ControlKind::Date => self.native_date,
            ControlKind::Time => self.native_time,
            _ => true,
        }
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::probe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_degrades_special_kinds_only() {
        let caps = Capabilities::plain();
        assert!(!caps.honors(ControlKind::Color));
        assert!(!caps.honors(ControlKind::Date));
        assert!(!caps.honors(ControlKind::Time));
        assert!(caps.honors(ControlKind::Range));
        assert!(caps.honors(ControlKind::Text));
    }

    #[test]
    fn test_probe_keeps_date_and_time() {
        let caps = Capabilities::probe();
        assert!(caps.native_date);
        assert!(caps.native_time);
    }
}
