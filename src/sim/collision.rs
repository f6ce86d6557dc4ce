//! Landing detection between the player and platforms
//!
//! Platforms are one-way: the player passes through them going up and only
//! lands on a same-colored platform while falling onto its top edge.

use super::state::{ColorTag, Platform, Rect};
use crate::consts::LANDING_TOLERANCE;

/// True when a player with rect `player`, vertical velocity `vy` and color
/// `color` lands on `platform` this frame.
///
/// The bottom edge must be within one frame's fall (`vy`) plus a pixel of
/// the platform top, which keeps fast falls from tunneling through while
/// rejecting side and underside contacts.
pub fn lands_on(player: &Rect, vy: f32, color: ColorTag, platform: &Platform) -> bool {
    let top = &platform.rect;
    vy > 0.0
        && player.overlaps(top)
        && color == platform.color
        && player.right() > top.left()
        && player.left() < top.right()
        && player.bottom() <= top.top() + vy + LANDING_TOLERANCE
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{PlatformId, PlatformState};

    fn platform(color: ColorTag) -> Platform {
        Platform {
            id: PlatformId(1),
            rect: Rect::new(100.0, 500.0, 200.0, 20.0),
            color,
            floor: 1,
            state: PlatformState::Normal,
        }
    }

    #[test]
    fn test_lands_when_falling_onto_top() {
        let p = platform(ColorTag::Red);
        let player = Rect::new(150.0, 500.0 - 25.0 + 4.0, 25.0, 25.0);
        assert!(lands_on(&player, 5.0, ColorTag::Red, &p));
    }

    #[test]
    fn test_no_landing_when_rising() {
        let p = platform(ColorTag::Red);
        let player = Rect::new(150.0, 480.0, 25.0, 25.0);
        assert!(!lands_on(&player, -5.0, ColorTag::Red, &p));
        assert!(!lands_on(&player, 0.0, ColorTag::Red, &p));
    }

    #[test]
    fn test_no_landing_on_other_color() {
        let p = platform(ColorTag::Blue);
        let player = Rect::new(150.0, 479.0, 25.0, 25.0);
        assert!(!lands_on(&player, 5.0, ColorTag::Red, &p));
    }

    #[test]
    fn test_no_landing_from_deep_below_top() {
        // Bottom edge 10px into the platform with only 5px of fall this frame
        let p = platform(ColorTag::Red);
        let player = Rect::new(150.0, 485.0, 25.0, 25.0);
        assert!(!lands_on(&player, 5.0, ColorTag::Red, &p));
    }

    #[test]
    fn test_landing_window_edge() {
        // Window is top + vy + 1 = 505 for vy = 4
        let p = platform(ColorTag::Red);
        let at_edge = Rect::new(150.0, 480.0, 25.0, 25.0);
        assert!(lands_on(&at_edge, 4.0, ColorTag::Red, &p));
        let past_edge = Rect::new(150.0, 480.5, 25.0, 25.0);
        assert!(!lands_on(&past_edge, 4.0, ColorTag::Red, &p));
    }

    #[test]
    fn test_fast_fall_still_lands() {
        let p = platform(ColorTag::Red);
        let player = Rect::new(150.0, 493.0, 25.0, 25.0);
        assert!(lands_on(&player, 20.0, ColorTag::Red, &p));
    }

    #[test]
    fn test_no_landing_without_overlap() {
        let p = platform(ColorTag::Red);
        let beside = Rect::new(300.0, 479.0, 25.0, 25.0);
        assert!(!lands_on(&beside, 5.0, ColorTag::Red, &p));
        let above = Rect::new(150.0, 470.0, 25.0, 25.0);
        assert!(!lands_on(&above, 5.0, ColorTag::Red, &p));
    }
}
