//! Spacing parameters shared by every layout pass.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Separation factor between siblings sharing a parent, the baseline the
/// cousin factor is measured from.
pub const SIBLING_SEPARATION: f32 = 1.2;

/// Separation factor between neighbours with different parents.
pub const COUSIN_SEPARATION: f32 = 1.4;

/// Configuration for the chart layout.
///
/// Deserializes from a camelCase JS object; missing keys keep their default.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutParams {
    /// Radius of a person circle (default: 20).
    pub node_radius: f32,
    /// Horizontal offset from a node to its displayed partner (default: 60).
    pub partner_distance: f32,
    /// Base horizontal spacing unit between neighbours (default: 50).
    pub sibling_spacing_h: f32,
    /// Vertical spacing between generations (default: 130).
    pub generation_spacing_v: f32,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            node_radius: 20.0,
            partner_distance: 60.0,
            sibling_spacing_h: 50.0,
            generation_spacing_v: 130.0,
        }
    }
}

impl LayoutParams {
    /// Reject parameters that cannot yield a non-overlapping chart.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("nodeRadius", self.node_radius),
            ("partnerDistance", self.partner_distance),
            ("siblingSpacingH", self.sibling_spacing_h),
            ("generationSpacingV", self.generation_spacing_v),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::InvalidLayoutParams {
                    name,
                    reason: format!("must be a positive finite number, got {value}"),
                });
            }
        }

        // A couple occupies two slots, which must not overlap each other
        if self.partner_distance < self.min_slot_spacing() {
            return Err(Error::InvalidLayoutParams {
                name: "partnerDistance",
                reason: format!(
                    "must be at least 3 * nodeRadius ({}), got {}",
                    self.min_slot_spacing(),
                    self.partner_distance
                ),
            });
        }
        Ok(())
    }

    /// Minimum distance between two occupied slots of a generation.
    #[inline]
    pub fn min_slot_spacing(&self) -> f32 {
        3.0 * self.node_radius
    }

    /// Horizontal offset of the couple's center from the primary node.
    #[inline]
    pub fn partner_anchor(&self, has_partner: bool) -> f32 {
        if has_partner {
            self.partner_distance / 2.0
        } else {
            0.0
        }
    }

    /// Horizontal extent a node occupies right of its own center.
    #[inline]
    pub fn partner_extent(&self, has_partner: bool) -> f32 {
        if has_partner { self.partner_distance } else { 0.0 }
    }

    /// Center-to-center distance the tidy pass keeps between two horizontal
    /// neighbours, `left` being the one with the smaller x.
    ///
    /// Unpartnered siblings sit exactly one minimum slot spacing apart.
    /// Neighbours with different parents get the extra
    /// `(COUSIN_SEPARATION - SIBLING_SEPARATION) * siblingSpacingH`, and
    /// every partnered node of the pair adds one partner distance, so the gap
    /// grows strictly with the number of partners.
    pub fn separation(&self, siblings: bool, left_partner: bool, right_partner: bool) -> f32 {
        let mut gap = self.min_slot_spacing();
        if !siblings {
            gap += (COUSIN_SEPARATION - SIBLING_SEPARATION) * self.sibling_spacing_h;
        }
        gap + self.partner_extent(left_partner) + self.partner_extent(right_partner)
    }
}
