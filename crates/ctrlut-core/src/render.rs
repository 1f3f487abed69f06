//! Render-ready LUT objects and the bridge that keeps the renderer's maps in
//! step with edits.
//!
//! The renderer holds two flat maps keyed by sampler name: a general-purpose
//! cache and the map of LUTs bound for the active scene. Every edit that
//! touches a sampler's content, name or presence goes through
//! [`RenderBridge::sync`] or [`RenderBridge::evict`], which rebuild or drop
//! the entry inside one critical section. The maps never hold an object built
//! from an older version of a sampler.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::codec::{Domain, TABLE_LEN};
use crate::sampler::LutSampler;

/// Immutable snapshot of a sampler in the form the renderer consumes.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderLut {
    name: String,
    domain: Domain,
    values: [f32; TABLE_LEN],
}

impl RenderLut {
    pub fn from_sampler(sampler: &LutSampler) -> Self {
        Self {
            name: sampler.name().to_string(),
            domain: sampler.domain(),
            values: *sampler.table().values(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    pub fn values(&self) -> &[f32; TABLE_LEN] {
        &self.values
    }

    /// Whether this snapshot still reflects `sampler`.
    pub fn matches(&self, sampler: &LutSampler) -> bool {
        self.name == sampler.name()
            && self.domain == sampler.domain()
            && &self.values == sampler.table().values()
    }

    /// Nearest-entry lookup for an input in [-1, 1] (or [0, 1] for absolute).
    pub fn sample(&self, x: f32) -> f32 {
        self.values[table_index(self.domain, x)]
    }
}

/// Table index the hardware reads for lookup argument `x`.
///
/// Absolute samplers index `|x|` over 256 steps. Signed samplers quantize
/// `x` to a two's-complement byte: 0..128 positive, 128..256 negative.
pub fn table_index(domain: Domain, x: f32) -> usize {
    let x = if x.is_nan() { 0.0 } else { x };
    match domain {
        Domain::Absolute => ((x.abs() * 256.0) as usize).min(TABLE_LEN - 1),
        Domain::Signed => {
            let step = (x.clamp(-1.0, 1.0) * 128.0).floor() as i32;
            if step >= 0 {
                (step as usize).min(TABLE_LEN / 2 - 1)
            } else {
                (TABLE_LEN as i32 + step.max(-128)) as usize
            }
        }
    }
}

/// A name-keyed map of live render objects.
#[derive(Debug, Default)]
pub struct LutMap(HashMap<String, Arc<RenderLut>>);

impl LutMap {
    pub fn insert(&mut self, name: impl Into<String>, lut: Arc<RenderLut>) {
        self.0.insert(name.into(), lut);
    }

    pub fn remove(&mut self, name: &str) -> Option<Arc<RenderLut>> {
        self.0.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<Arc<RenderLut>> {
        self.0.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

/// Both renderer maps, locked together.
#[derive(Debug, Default)]
pub struct RenderMaps {
    /// General-purpose cache the renderer may fill on its own.
    pub cache: LutMap,
    /// LUTs bound for drawing the active scene.
    pub active: LutMap,
}

/// Shared handle to the renderer's maps for the lifetime of an open document.
///
/// Cloning shares the same maps.
#[derive(Debug, Clone, Default)]
pub struct RenderBridge {
    maps: Arc<Mutex<RenderMaps>>,
}

impl RenderBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Evict `previous_name` (when it differs) and the sampler's current name
    /// from both maps, then bind a freshly built object under the current name.
    pub fn sync(&self, previous_name: Option<&str>, sampler: &LutSampler) {
        let name = sampler.name();
        let fresh = Arc::new(RenderLut::from_sampler(sampler));

        let mut maps = self.maps.lock();
        if let Some(old) = previous_name.filter(|old| *old != name) {
            maps.cache.remove(old);
            maps.active.remove(old);
        }
        maps.cache.remove(name);
        maps.active.remove(name);
        maps.active.insert(name, fresh);
        tracing::debug!(sampler = name, renamed_from = ?previous_name, "LUT render entry rebuilt");
    }

    /// Drop every entry for `name` from both maps.
    pub fn evict(&self, name: &str) {
        let mut maps = self.maps.lock();
        let cached = maps.cache.remove(name).is_some();
        let active = maps.active.remove(name).is_some();
        if cached || active {
            tracing::debug!(sampler = name, cached, active, "LUT render entry evicted");
        }
    }

    /// Run `f` with both maps locked. Used by the renderer side.
    pub fn with_maps<R>(&self, f: impl FnOnce(&mut RenderMaps) -> R) -> R {
        f(&mut *self.maps.lock())
    }

    pub fn active(&self, name: &str) -> Option<Arc<RenderLut>> {
        self.maps.lock().active.get(name)
    }

    pub fn is_active(&self, name: &str) -> bool {
        self.maps.lock().active.contains(name)
    }

    pub fn is_cached(&self, name: &str) -> bool {
        self.maps.lock().cache.contains(name)
    }

    /// Sorted names currently bound in the active map.
    pub fn active_names(&self) -> Vec<String> {
        let maps = self.maps.lock();
        let mut names: Vec<String> = maps.active.names().map(str::to_string).collect();
        names.sort();
        names
    }
}
