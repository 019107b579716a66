//! Escape sequence dispatch table
//!
//! Each supported sequence is described by a byte template. A `%` in a
//! template matches a parameter list: runs of ASCII digits separated by
//! `;`, where an empty run stands for 0 (missing). The list always holds
//! at least one entry. Every other template byte must match literally.

use super::action::Command;

const ESC: u8 = 0x1b;

struct Template {
    pattern: &'static [u8],
    build: fn(&[u16]) -> Command,
}

fn arg(params: &[u16], index: usize) -> u16 {
    params.get(index).copied().unwrap_or(0)
}

fn insert_chars(p: &[u16]) -> Command {
    Command::InsertChars(arg(p, 0))
}

fn cursor_up(p: &[u16]) -> Command {
    Command::CursorUp(arg(p, 0))
}

fn cursor_down(p: &[u16]) -> Command {
    Command::CursorDown(arg(p, 0))
}

fn cursor_forward(p: &[u16]) -> Command {
    Command::CursorForward(arg(p, 0))
}

fn cursor_back(p: &[u16]) -> Command {
    Command::CursorBack(arg(p, 0))
}

fn cursor_next_line(p: &[u16]) -> Command {
    Command::CursorNextLine(arg(p, 0))
}

fn cursor_prev_line(p: &[u16]) -> Command {
    Command::CursorPrevLine(arg(p, 0))
}

fn cursor_column(p: &[u16]) -> Command {
    Command::CursorColumn(arg(p, 0))
}

fn cursor_row(p: &[u16]) -> Command {
    Command::CursorRow(arg(p, 0))
}

fn cursor_position(p: &[u16]) -> Command {
    Command::CursorPosition {
        row: arg(p, 0),
        col: arg(p, 1),
    }
}

fn erase_in_display(p: &[u16]) -> Command {
    Command::EraseInDisplay(arg(p, 0))
}

fn erase_in_line(p: &[u16]) -> Command {
    Command::EraseInLine(arg(p, 0))
}

fn erase_chars(p: &[u16]) -> Command {
    Command::EraseChars(arg(p, 0))
}

fn insert_lines(p: &[u16]) -> Command {
    Command::InsertLines(arg(p, 0))
}

fn delete_lines(p: &[u16]) -> Command {
    Command::DeleteLines(arg(p, 0))
}

fn delete_chars(p: &[u16]) -> Command {
    Command::DeleteChars(arg(p, 0))
}

fn scroll_up(p: &[u16]) -> Command {
    Command::ScrollUp(arg(p, 0))
}

fn scroll_down(p: &[u16]) -> Command {
    Command::ScrollDown(arg(p, 0))
}

fn repeat_last(p: &[u16]) -> Command {
    Command::RepeatLast(arg(p, 0))
}

fn set_scroll_region(p: &[u16]) -> Command {
    Command::SetScrollRegion {
        top: arg(p, 0),
        bottom: arg(p, 1),
    }
}

fn set_mode(p: &[u16]) -> Command {
    Command::SetMode {
        modes: p.to_vec(),
        enable: true,
    }
}

fn reset_mode(p: &[u16]) -> Command {
    Command::SetMode {
        modes: p.to_vec(),
        enable: false,
    }
}

fn set_private_modes(p: &[u16]) -> Command {
    Command::SetPrivateModes {
        modes: p.to_vec(),
        enable: true,
    }
}

fn reset_private_modes(p: &[u16]) -> Command {
    Command::SetPrivateModes {
        modes: p.to_vec(),
        enable: false,
    }
}

fn sgr(p: &[u16]) -> Command {
    Command::Sgr(p.to_vec())
}

fn window_ops(_: &[u16]) -> Command {
    Command::WindowOps
}

fn soft_reset(_: &[u16]) -> Command {
    Command::SoftReset
}

fn designate_acs(_: &[u16]) -> Command {
    Command::DesignateAcs
}

fn undesignate_acs(_: &[u16]) -> Command {
    Command::UndesignateAcs
}

fn save_cursor(_: &[u16]) -> Command {
    Command::SaveCursor
}

fn restore_cursor(_: &[u16]) -> Command {
    Command::RestoreCursor
}

fn full_reset(_: &[u16]) -> Command {
    Command::FullReset
}

fn index(_: &[u16]) -> Command {
    Command::Index
}

fn next_line(_: &[u16]) -> Command {
    Command::NextLine
}

fn reverse_index(_: &[u16]) -> Command {
    Command::ReverseIndex
}

fn keypad_application(_: &[u16]) -> Command {
    Command::KeypadApplication
}

fn keypad_numeric(_: &[u16]) -> Command {
    Command::KeypadNumeric
}

fn string_terminator(_: &[u16]) -> Command {
    Command::StringTerminator
}

static TEMPLATES: &[Template] = &[
    // CSI
    Template { pattern: b"\x1b[%@", build: insert_chars },
    Template { pattern: b"\x1b[%A", build: cursor_up },
    Template { pattern: b"\x1b[%B", build: cursor_down },
    Template { pattern: b"\x1b[%C", build: cursor_forward },
    Template { pattern: b"\x1b[%D", build: cursor_back },
    Template { pattern: b"\x1b[%E", build: cursor_next_line },
    Template { pattern: b"\x1b[%F", build: cursor_prev_line },
    Template { pattern: b"\x1b[%G", build: cursor_column },
    Template { pattern: b"\x1b[%H", build: cursor_position },
    Template { pattern: b"\x1b[%J", build: erase_in_display },
    Template { pattern: b"\x1b[%K", build: erase_in_line },
    Template { pattern: b"\x1b[%L", build: insert_lines },
    Template { pattern: b"\x1b[%M", build: delete_lines },
    Template { pattern: b"\x1b[%P", build: delete_chars },
    Template { pattern: b"\x1b[%S", build: scroll_up },
    Template { pattern: b"\x1b[%T", build: scroll_down },
    Template { pattern: b"\x1b[%X", build: erase_chars },
    Template { pattern: b"\x1b[%a", build: cursor_forward },
    Template { pattern: b"\x1b[%b", build: repeat_last },
    Template { pattern: b"\x1b[%d", build: cursor_row },
    Template { pattern: b"\x1b[%e", build: cursor_down },
    Template { pattern: b"\x1b[%f", build: cursor_position },
    Template { pattern: b"\x1b[%h", build: set_mode },
    Template { pattern: b"\x1b[%l", build: reset_mode },
    Template { pattern: b"\x1b[%m", build: sgr },
    Template { pattern: b"\x1b[%r", build: set_scroll_region },
    Template { pattern: b"\x1b[%t", build: window_ops },
    Template { pattern: b"\x1b[?%h", build: set_private_modes },
    Template { pattern: b"\x1b[?%l", build: reset_private_modes },
    Template { pattern: b"\x1b[!p", build: soft_reset },
    // ESC
    Template { pattern: b"\x1b(0", build: designate_acs },
    Template { pattern: b"\x1b(B", build: undesignate_acs },
    Template { pattern: b"\x1b7", build: save_cursor },
    Template { pattern: b"\x1b8", build: restore_cursor },
    Template { pattern: b"\x1bc", build: full_reset },
    Template { pattern: b"\x1bD", build: index },
    Template { pattern: b"\x1bE", build: next_line },
    Template { pattern: b"\x1bM", build: reverse_index },
    Template { pattern: b"\x1b=", build: keypad_application },
    Template { pattern: b"\x1b>", build: keypad_numeric },
    Template { pattern: b"\x1b\\", build: string_terminator },
];

/// Parse a `;`-separated digit list starting at `*i`
fn parse_params(data: &[u8], i: &mut usize, params: &mut Vec<u16>) {
    loop {
        let mut value: u16 = 0;
        while let Some(digit) = data.get(*i).filter(|b| b.is_ascii_digit()) {
            value = value.saturating_mul(10).saturating_add(u16::from(digit - b'0'));
            *i += 1;
        }
        params.push(value);

        if data.get(*i) == Some(&b';') {
            *i += 1;
        } else {
            break;
        }
    }
}

/// Match `data` against one template, returning the parameters
fn match_template(pattern: &[u8], data: &[u8]) -> Option<Vec<u16>> {
    if pattern.last() != data.last() {
        return None;
    }

    let mut params = Vec::new();
    let mut i = 0;
    for &p in pattern {
        if p == b'%' {
            parse_params(data, &mut i, &mut params);
        } else if data.get(i) == Some(&p) {
            i += 1;
        } else {
            return None;
        }
    }

    (i == data.len()).then_some(params)
}

/// Find the command a complete sequence stands for
pub fn dispatch(seq: &[u8]) -> Option<Command> {
    TEMPLATES.iter().find_map(|template| {
        match_template(template.pattern, seq).map(|params| (template.build)(&params))
    })
}

/// Whether the sequence can no longer grow into anything meaningful.
///
/// An alphabetic last byte ends any sequence. A CSI sequence also ends on
/// any final byte in `0x40..=0x7e`.
pub fn is_terminated(seq: &[u8]) -> bool {
    let Some(&last) = seq.last() else {
        return false;
    };
    if last.is_ascii_alphabetic() {
        return true;
    }
    matches!(seq, [ESC, b'[', _, ..] if (0x40..=0x7e).contains(&last))
}

/// The OSC number of an `ESC ] digits ;` introducer
pub fn osc_introducer(seq: &[u8]) -> Option<u16> {
    let digits = seq.strip_prefix(b"\x1b]")?.strip_suffix(b";")?;
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return None;
    }
    Some(digits.iter().fold(0u16, |acc, d| {
        acc.saturating_mul(10).saturating_add(u16::from(d - b'0'))
    }))
}
