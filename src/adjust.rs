use serde::Deserialize;

use crate::color::Channel;
use crate::palette::Palette;
use crate::selection::SelectionMask;

/// Shift `channel` by `delta` on every slot in `mask`, saturating each value
/// to [0, 255].
///
/// A zero delta or an empty mask leaves the palette untouched.
pub fn adjust_palette(
    palette: &mut Palette,
    mask: SelectionMask,
    channel: Channel,
    delta: i32,
) -> &mut Palette {
    if delta == 0 || mask.is_empty() {
        return palette;
    }
    tracing::trace!(%mask, %channel, delta, "adjusting palette");
    for slot in mask.iter() {
        palette[slot] = palette[slot].adjust(channel, delta);
    }
    palette
}

/// Step size of one key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Fine,
    Normal,
    Coarse,
}

/// Magnitudes for each [`Step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Steps {
    pub fine: i32,
    pub normal: i32,
    pub coarse: i32,
}

impl Default for Steps {
    fn default() -> Self {
        Self {
            fine: 1,
            normal: 3,
            coarse: 9,
        }
    }
}

impl Steps {
    pub fn delta(&self, step: Step, direction: i32) -> i32 {
        let magnitude = match step {
            Step::Fine => self.fine,
            Step::Normal => self.normal,
            Step::Coarse => self.coarse,
        };
        magnitude * direction.signum()
    }
}
