//! Color picker: palette quick-picks, named colors and a custom color.
//!
//! The selection is pushed to subscribers through a `watch` channel after every
//! change, so the form never has to poll for it.

use std::sync::Arc;

use tokio::sync::watch;

use catalogdesk_products::{ColorRejection, ColorSet, ColorToken, Toggled};

use crate::error::ClientResult;
use crate::notify::Notifier;

/// Which input the operator is using.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PickerMode {
    #[default]
    Palette,
    Custom,
}

pub struct ColorPicker {
    set: ColorSet,
    mode: PickerMode,
    current: ColorToken,
    notifier: Arc<dyn Notifier>,
    tx: watch::Sender<Vec<ColorToken>>,
}

impl std::fmt::Debug for ColorPicker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColorPicker")
            .field("set", &self.set)
            .field("mode", &self.mode)
            .field("current", &self.current)
            .finish()
    }
}

impl ColorPicker {
    pub fn new(max_colors: usize, notifier: Arc<dyn Notifier>) -> Self {
        let (tx, _rx) = watch::channel(Vec::new());
        Self {
            set: ColorSet::new(max_colors),
            mode: PickerMode::default(),
            current: ColorToken::default(),
            notifier,
            tx,
        }
    }

    /// Receive the selection after every change.
    pub fn subscribe(&self) -> watch::Receiver<Vec<ColorToken>> {
        self.tx.subscribe()
    }

    pub fn selected(&self) -> &[ColorToken] {
        self.set.as_slice()
    }

    pub fn max(&self) -> usize {
        self.set.max()
    }

    pub fn is_full(&self) -> bool {
        self.set.is_full()
    }

    pub fn mode(&self) -> PickerMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: PickerMode) {
        self.mode = mode;
    }

    pub fn current(&self) -> &ColorToken {
        &self.current
    }

    /// Update the custom color swatch without selecting it.
    pub fn set_current(&mut self, raw: &str) -> ClientResult<()> {
        self.current = ColorToken::parse(raw)?;
        Ok(())
    }

    /// Add a color. A duplicate or a full set is reported to the operator and
    /// leaves the selection alone.
    pub fn add(&mut self, raw: &str) -> ClientResult<bool> {
        let color = ColorToken::parse(raw)?;
        match self.set.add(color.clone()) {
            Ok(()) => {
                self.current = color;
                self.publish();
                Ok(true)
            }
            Err(rejection) => {
                let notice = rejection.notice();
                match rejection {
                    ColorRejection::AlreadySelected(_) => self.notifier.info(&notice),
                    ColorRejection::LimitReached { .. } => self.notifier.warning(&notice),
                }
                Ok(false)
            }
        }
    }

    /// Palette click.
    pub fn pick(&mut self, raw: &str) -> ClientResult<bool> {
        self.set_mode(PickerMode::Palette);
        self.add(raw)
    }

    /// "Add" button in custom mode.
    pub fn add_current(&mut self) -> ClientResult<bool> {
        let current = self.current.as_str().to_string();
        self.add(&current)
    }

    /// Named-color checkbox.
    pub fn toggle(&mut self, raw: &str) -> ClientResult<Option<Toggled>> {
        let color = ColorToken::parse(raw)?;
        match self.set.toggle(color) {
            Ok(toggled) => {
                self.publish();
                Ok(Some(toggled))
            }
            Err(rejection) => {
                self.notifier.warning(&rejection.notice());
                Ok(None)
            }
        }
    }

    /// Remove a selected color; removing a non-member is a no-op.
    pub fn remove(&mut self, raw: &str) -> ClientResult<bool> {
        let color = ColorToken::parse(raw)?;
        let removed = self.set.remove(&color);
        if removed {
            self.publish();
        }
        Ok(removed)
    }

    pub fn clear(&mut self) {
        self.set.clear();
        self.mode = PickerMode::default();
        self.current = ColorToken::default();
        self.publish();
    }

    fn publish(&self) {
        self.tx.send_replace(self.set.as_slice().to_vec());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::{NoticeKind, RecordingNotifier};
    use catalogdesk_products::DEFAULT_CUSTOM_COLOR;

    fn picker(max: usize) -> (ColorPicker, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::new());
        (ColorPicker::new(max, notifier.clone()), notifier)
    }

    fn strings(colors: &[ColorToken]) -> Vec<&str> {
        colors.iter().map(ColorToken::as_str).collect()
    }

    #[test]
    fn duplicate_is_an_info_notice() {
        let (mut picker, notifier) = picker(5);
        assert!(picker.pick("#ff6b6b").unwrap());
        assert!(!picker.add("#FF6B6B").unwrap());

        assert_eq!(strings(picker.selected()), vec!["#FF6B6B"]);
        assert_eq!(
            notifier.messages(NoticeKind::Info),
            vec!["Color already selected".to_string()]
        );
    }

    #[test]
    fn sixth_color_warns_and_is_dropped() {
        let (mut picker, notifier) = picker(5);
        for c in ["Red", "Blue", "Green", "Yellow", "Black"] {
            picker.add(c).unwrap();
        }
        assert!(!picker.add("White").unwrap());
        assert_eq!(picker.selected().len(), 5);
        assert_eq!(
            notifier.messages(NoticeKind::Warning),
            vec!["Maximum 5 colors allowed".to_string()]
        );
    }

    #[test]
    fn custom_color_flow() {
        let (mut picker, _) = picker(5);
        assert_eq!(picker.current().as_str(), DEFAULT_CUSTOM_COLOR);
        picker.set_mode(PickerMode::Custom);
        picker.set_current("#00b894").unwrap();
        assert!(picker.add_current().unwrap());
        assert_eq!(strings(picker.selected()), vec!["#00B894"]);

        picker.pick("#4ecdc4").unwrap();
        assert_eq!(picker.current().as_str(), "#4ECDC4");
        assert_eq!(picker.mode(), PickerMode::Palette);
    }

    #[test]
    fn toggle_and_remove() {
        let (mut picker, _) = picker(5);
        assert_eq!(picker.toggle("Black").unwrap(), Some(Toggled::Added));
        assert_eq!(picker.toggle("Black").unwrap(), Some(Toggled::Removed));
        assert!(!picker.remove("Black").unwrap());
    }

    #[test]
    fn subscribers_see_every_change() {
        let (mut picker, _) = picker(5);
        let rx = picker.subscribe();
        picker.add("Red").unwrap();
        picker.add("Blue").unwrap();
        assert_eq!(strings(&rx.borrow()), vec!["Red", "Blue"]);

        picker.remove("Red").unwrap();
        assert_eq!(strings(&rx.borrow()), vec!["Blue"]);

        picker.clear();
        assert!(rx.borrow().is_empty());
        assert_eq!(picker.mode(), PickerMode::Palette);
    }

    #[test]
    fn blank_input_is_a_validation_error() {
        let (mut picker, _) = picker(5);
        assert!(picker.add("  ").unwrap_err().is_validation());
    }
}
