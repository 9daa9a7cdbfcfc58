use crossterm::style::{Color, Stylize};

use crate::state::{Cell, State, EMPTY, GOAL_PIECE, SENTINEL, WALL};

const PALETTE: [Color; 6] = [
    Color::Cyan,
    Color::Green,
    Color::Yellow,
    Color::Blue,
    Color::Magenta,
    Color::DarkCyan,
];

fn color_of(value: Cell) -> Color {
    match value {
        EMPTY => Color::DarkGrey,
        WALL => Color::Grey,
        SENTINEL => Color::DarkRed,
        GOAL_PIECE => Color::Red,
        id => PALETTE[id.unsigned_abs() as usize % PALETTE.len()],
    }
}

/// Print `state` in the `w,h,` grid format, optionally coloring each label.
///
/// Without color the output is identical to the `Display` impl.
pub fn paint(state: &State, colored: bool) -> String {
    if !colored {
        return state.to_string();
    }

    let mut out = format!("{},{},", state.width(), state.height());
    for row in state.rows() {
        out.push('\n');
        for &value in row {
            let styled = value.to_string().with(color_of(value));
            let styled = if value == GOAL_PIECE {
                styled.bold()
            } else {
                styled
            };
            out.push_str(&format!("{},", styled));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_paint_matches_display() {
        let s: State = "3,2,\n1,2,0,\n3,3,-1,".parse().unwrap();
        assert_eq!(paint(&s, false), s.to_string());
    }

    #[test]
    fn colored_paint_keeps_the_values() {
        let s: State = "2,1,\n2,5,".parse().unwrap();
        let painted = paint(&s, true);
        assert!(painted.starts_with("2,1,\n"));
        assert!(painted.contains('2') && painted.contains('5'));
    }

    #[test]
    fn reserved_labels_have_fixed_colors() {
        assert_eq!(color_of(GOAL_PIECE), Color::Red);
        assert_eq!(color_of(EMPTY), Color::DarkGrey);
        assert_eq!(color_of(3), color_of(9));
    }
}
