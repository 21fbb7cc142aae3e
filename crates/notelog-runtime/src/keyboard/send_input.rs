//! Keyboard injection on Windows through `SendInput`.

use async_trait::async_trait;
use notelog_core::{Chord, Key, KeyboardSink, LogError, Modifier};
use tracing::debug;
use windows::Win32::UI::Input::KeyboardAndMouse::{
    INPUT, INPUT_0, INPUT_KEYBOARD, KEYBD_EVENT_FLAGS, KEYBDINPUT, KEYEVENTF_EXTENDEDKEY,
    KEYEVENTF_KEYUP, KEYEVENTF_UNICODE, SendInput, VIRTUAL_KEY, VK_CONTROL, VK_END, VK_MENU,
    VK_RETURN, VK_SHIFT,
};

/// `KeyboardSink` that injects events into the foreground input stream.
#[derive(Debug, Clone, Copy, Default)]
pub struct SendInputKeyboard;

impl SendInputKeyboard {
    pub const fn new() -> Self {
        Self
    }
}

fn key_event(vk: VIRTUAL_KEY, scan: u16, flags: KEYBD_EVENT_FLAGS) -> INPUT {
    INPUT {
        r#type: INPUT_KEYBOARD,
        Anonymous: INPUT_0 {
            ki: KEYBDINPUT {
                wVk: vk,
                wScan: scan,
                dwFlags: flags,
                time: 0,
                dwExtraInfo: 0,
            },
        },
    }
}

fn press(vk: VIRTUAL_KEY, events: &mut Vec<INPUT>) {
    press_with(vk, KEYBD_EVENT_FLAGS(0), events);
}

fn press_with(vk: VIRTUAL_KEY, flags: KEYBD_EVENT_FLAGS, events: &mut Vec<INPUT>) {
    events.push(key_event(vk, 0, flags));
    events.push(key_event(vk, 0, flags | KEYEVENTF_KEYUP));
}

/// Unicode text-entry events, one down/up pair per UTF-16 unit.
/// Line breaks become Enter presses; `\r` is dropped so CRLF yields one.
fn text_events(text: &str) -> Vec<INPUT> {
    let mut events = Vec::with_capacity(text.len() * 2);
    for ch in text.chars() {
        match ch {
            '\r' => {}
            '\n' => press(VK_RETURN, &mut events),
            _ => {
                let mut units = [0u16; 2];
                for unit in ch.encode_utf16(&mut units) {
                    events.push(key_event(VIRTUAL_KEY(0), *unit, KEYEVENTF_UNICODE));
                    events.push(key_event(
                        VIRTUAL_KEY(0),
                        *unit,
                        KEYEVENTF_UNICODE | KEYEVENTF_KEYUP,
                    ));
                }
            }
        }
    }
    events
}

const fn modifier_key(modifier: Modifier) -> VIRTUAL_KEY {
    match modifier {
        Modifier::Control => VK_CONTROL,
        Modifier::Shift => VK_SHIFT,
        Modifier::Alt => VK_MENU,
    }
}

fn chord_events(chord: &Chord) -> Vec<INPUT> {
    let mut events = Vec::new();
    for modifier in &chord.modifiers {
        events.push(key_event(modifier_key(*modifier), 0, KEYBD_EVENT_FLAGS(0)));
    }
    match chord.key {
        // Letter and digit virtual-key codes equal their uppercase ASCII
        Key::Char(c) => press(VIRTUAL_KEY(c.to_ascii_uppercase() as u16), &mut events),
        // End sits on the extended (navigation) block
        Key::End => press_with(VK_END, KEYEVENTF_EXTENDEDKEY, &mut events),
    }
    for modifier in chord.modifiers.iter().rev() {
        events.push(key_event(modifier_key(*modifier), 0, KEYEVENTF_KEYUP));
    }
    events
}

#[allow(unsafe_code)]
fn send(events: &[INPUT]) -> Result<(), LogError> {
    if events.is_empty() {
        return Ok(());
    }
    // SAFETY: `events` is a valid slice of fully initialised keyboard INPUTs
    // and the size argument matches the element type.
    let sent = unsafe { SendInput(events, std::mem::size_of::<INPUT>() as i32) };
    if sent as usize == events.len() {
        Ok(())
    } else {
        Err(LogError::Input(format!(
            "SendInput delivered {sent} of {} events",
            events.len()
        )))
    }
}

#[async_trait]
impl KeyboardSink for SendInputKeyboard {
    async fn type_text(&self, text: &str) -> Result<(), LogError> {
        debug!(chars = text.chars().count(), "SendInput text entry");
        send(&text_events(text))
    }

    async fn send_chord(&self, chord: &Chord) -> Result<(), LogError> {
        debug!(%chord, "SendInput chord");
        send(&chord_events(chord))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_events_pair_down_and_up() {
        assert_eq!(text_events("ab").len(), 4);
        // Astral characters take two UTF-16 units
        assert_eq!(text_events("😀").len(), 4);
    }

    #[test]
    fn crlf_becomes_single_enter() {
        assert_eq!(text_events("a\r\nb").len(), 6);
    }

    #[test]
    fn save_chord_wraps_key_in_modifier() {
        // ctrl down, s down, s up, ctrl up
        assert_eq!(chord_events(&Chord::save()).len(), 4);
    }

    #[test]
    fn document_end_chord_presses_extended_end() {
        let events = chord_events(&Chord::document_end());
        assert_eq!(events.len(), 4);
        // SAFETY: every event built here is a keyboard input
        #[allow(unsafe_code)]
        let end_down = unsafe { events[1].Anonymous.ki };
        assert_eq!(end_down.wVk, VK_END);
        assert!(end_down.dwFlags.contains(KEYEVENTF_EXTENDEDKEY));
    }
}
