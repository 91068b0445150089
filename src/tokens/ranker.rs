use super::codec::{self, Rgb};
use super::dataset::TokenSet;

/// Distance between black and white, the farthest two RGB colors can be.
pub const MAX_DISTANCE: f64 = 441.672_955_930_063_7;

#[derive(Debug, Clone, PartialEq)]
pub struct Ranked<'a> {
    pub name: &'a str,
    pub value: &'a str,
    pub distance: f64,
}

/// Every token whose light value decodes, nearest first, cut to `limit`.
/// Equal distances keep dataset order.
pub fn rank<'a>(input: Rgb, tokens: &'a TokenSet, limit: usize) -> Vec<Ranked<'a>> {
    let mut ranked: Vec<Ranked<'a>> = tokens
        .iter()
        .filter_map(|(name, token)| {
            let value = token.light_value()?;
            let rgb = codec::decode(value)?;
            Some(Ranked {
                name,
                value,
                distance: input.distance(rgb),
            })
        })
        .collect();

    ranked.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    ranked.truncate(limit);
    ranked
}

/// Map a distance onto 100 (identical) down to 0 (black vs white).
pub fn similarity(distance: f64) -> u8 {
    let percent = ((1.0 - distance / MAX_DISTANCE) * 100.0).round();
    percent.clamp(0.0, 100.0) as u8
}
