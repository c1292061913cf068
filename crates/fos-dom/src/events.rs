//! Mouse Events
//!
//! MouseEvent with button state and modifier keys.

/// Mouse event
#[derive(Debug, Clone)]
pub struct MouseEvent {
    pub event_type: MouseEventType,
    pub button: MouseButton,

    // Modifiers
    pub shift_key: bool,
    pub ctrl_key: bool,
    pub meta_key: bool,

    // Event state
    pub bubbles: bool,
    pub cancelable: bool,
    default_prevented: bool,
    propagation_stopped: bool,
}

/// Mouse event types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseEventType {
    Click,
    AuxClick,
}

impl MouseEventType {
    /// DOM event name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::AuxClick => "auxclick",
        }
    }
}

/// Mouse buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    /// Primary button (usually left)
    Primary,
    /// Auxiliary button (usually middle/wheel)
    Auxiliary,
    /// Secondary button (usually right)
    Secondary,
    /// Fourth button (usually back)
    Fourth,
    /// Fifth button (usually forward)
    Fifth,
}

impl MouseEvent {
    fn new(event_type: MouseEventType, button: MouseButton) -> Self {
        Self {
            event_type,
            button,
            shift_key: false,
            ctrl_key: false,
            meta_key: false,
            bubbles: true,
            cancelable: true,
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    /// Primary-button click
    pub fn click() -> Self {
        Self::new(MouseEventType::Click, MouseButton::Primary)
    }

    /// `auxclick` for a non-primary button
    pub fn aux_click(button: MouseButton) -> Self {
        Self::new(MouseEventType::AuxClick, button)
    }

    /// Middle-button `auxclick`
    pub fn middle_click() -> Self {
        Self::aux_click(MouseButton::Auxiliary)
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl_key = true;
        self
    }

    pub fn with_meta(mut self) -> Self {
        self.meta_key = true;
        self
    }

    pub fn with_shift(mut self) -> Self {
        self.shift_key = true;
        self
    }

    /// Prevent default action
    pub fn prevent_default(&mut self) {
        if self.cancelable {
            self.default_prevented = true;
        }
    }

    /// Check if default was prevented
    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }

    /// Stop event propagation
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_click_event() {
        let event = MouseEvent::click();
        assert_eq!(event.event_type, MouseEventType::Click);
        assert_eq!(event.button, MouseButton::Primary);
        assert_eq!(event.event_type.name(), "click");
        assert!(!event.ctrl_key && !event.meta_key && !event.shift_key);
        assert!(event.bubbles);
    }

    #[test]
    fn test_prevent_default_requires_cancelable() {
        let mut event = MouseEvent::click();
        event.cancelable = false;
        event.prevent_default();
        assert!(!event.is_default_prevented());

        let mut event = MouseEvent::middle_click().with_ctrl();
        event.prevent_default();
        assert!(event.is_default_prevented());
        assert!(event.ctrl_key);
    }
}
