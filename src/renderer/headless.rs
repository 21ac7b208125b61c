//! Headless gateway
//!
//! Hands out sequential handles, counts draw calls and tracks which handles
//! are still live. Used by the driver binary and by tests.

use std::collections::HashSet;
use std::num::NonZeroU32;

use glam::Vec3;

use super::{AssetGateway, ModelId, RenderGateway, RenderHandle};
use crate::error::AssetError;

#[derive(Debug, Default)]
pub struct HeadlessGateway {
    next_handle: u32,
    live: HashSet<RenderHandle>,
    failing: HashSet<ModelId>,
    pub loads: usize,
    pub releases: usize,
    pub draws: usize,
    /// Releases of handles that were not live (should stay 0)
    pub bad_releases: usize,
}

impl HeadlessGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every load of `model` fail with [`AssetError::NotFound`]
    pub fn failing(mut self, model: ModelId) -> Self {
        self.failing.insert(model);
        self
    }

    /// Handles loaded and not yet released
    pub fn live_handles(&self) -> usize {
        self.live.len()
    }

    /// Reset the per-frame draw counter
    pub fn begin_frame(&mut self) {
        self.draws = 0;
    }
}

impl AssetGateway for HeadlessGateway {
    fn load_model(&mut self, model: ModelId) -> Result<RenderHandle, AssetError> {
        if self.failing.contains(&model) {
            return Err(AssetError::NotFound {
                path: model.model_path().to_string(),
            });
        }
        self.next_handle += 1;
        let handle = NonZeroU32::new(self.next_handle)
            .map(RenderHandle)
            .ok_or_else(|| AssetError::Malformed {
                path: model.model_path().to_string(),
                reason: "handle space exhausted".to_string(),
            })?;
        self.live.insert(handle);
        self.loads += 1;
        Ok(handle)
    }

    fn release(&mut self, handle: RenderHandle) {
        if self.live.remove(&handle) {
            self.releases += 1;
        } else {
            log::warn!("Release of unknown handle {:?}", handle);
            self.bad_releases += 1;
        }
    }
}

impl RenderGateway for HeadlessGateway {
    fn draw(&mut self, _handle: RenderHandle, _pos: Vec3, _scale: f32) {
        self.draws += 1;
    }
}
