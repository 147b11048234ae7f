//! Status display trait
//!
//! The UI toolkit lives in the device firmware. The controller only needs a
//! handful of screens and text slots, always accessed under the display lock.

/// Screens the controller can bring up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Screen {
    /// Normal operation
    Main,
    /// Full-screen message with title and detail lines
    Tip,
    /// Dimmed sleep screen
    Sleep,
    /// Power-off animation
    Shutdown,
}

/// Status display used by the lifecycle controller
pub trait StatusDisplay {
    /// Set the title and detail lines of the tip screen
    fn set_status_text(&mut self, title: &str, detail: &str);

    /// Switch screens; the UI may animate the transition
    fn request_screen_transition(&mut self, screen: Screen);

    /// Screen currently shown
    fn active_screen(&self) -> Screen;

    /// Update the low-battery countdown overlay
    fn show_countdown(&mut self, seconds: u8);

    /// Update the battery level indicator (percent)
    fn show_battery_level(&mut self, level: u8);

    /// Reflect the auto-sleep setting in the UI
    fn show_auto_sleep(&mut self, enabled: bool);
}

/// Extension trait for common display patterns
pub trait StatusDisplayExt: StatusDisplay {
    /// Put a message on the tip screen, switching to it if needed
    fn show_tip(&mut self, title: &str, detail: &str) {
        self.set_status_text(title, detail);
        if self.active_screen() != Screen::Tip {
            self.request_screen_transition(Screen::Tip);
        }
    }

    /// Switch screens, returning the one that was active before
    fn swap_screen(&mut self, screen: Screen) -> Screen {
        let previous = self.active_screen();
        if previous != screen {
            self.request_screen_transition(screen);
        }
        previous
    }
}

impl<T: StatusDisplay + ?Sized> StatusDisplayExt for T {}

#[cfg(test)]
mod tests {
    use super::*;

    struct Recorder {
        screen: Screen,
        transitions: u8,
        title_len: usize,
    }

    impl StatusDisplay for Recorder {
        fn set_status_text(&mut self, title: &str, _detail: &str) {
            self.title_len = title.len();
        }
        fn request_screen_transition(&mut self, screen: Screen) {
            self.screen = screen;
            self.transitions += 1;
        }
        fn active_screen(&self) -> Screen {
            self.screen
        }
        fn show_countdown(&mut self, _seconds: u8) {}
        fn show_battery_level(&mut self, _level: u8) {}
        fn show_auto_sleep(&mut self, _enabled: bool) {}
    }

    #[test]
    fn test_show_tip_transitions_once() {
        let mut display = Recorder {
            screen: Screen::Main,
            transitions: 0,
            title_len: 0,
        };
        display.show_tip("Low battery", "Please charge");
        display.show_tip("Low battery", "Please charge");
        assert_eq!(display.screen, Screen::Tip);
        assert_eq!(display.transitions, 1);
        assert_eq!(display.title_len, 11);
    }

    #[test]
    fn test_swap_screen_returns_previous() {
        let mut display = Recorder {
            screen: Screen::Main,
            transitions: 0,
            title_len: 0,
        };
        assert_eq!(display.swap_screen(Screen::Sleep), Screen::Main);
        assert_eq!(display.swap_screen(Screen::Sleep), Screen::Sleep);
        assert_eq!(display.transitions, 1);
    }
}
