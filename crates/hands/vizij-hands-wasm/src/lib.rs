use js_sys::{Float32Array, Uint16Array};
use serde::Serialize;
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;

use vizij_hands_core::{
    ControllerProfile, DisplayKind, Hand, HandConfig, HandInput, HandSystem, Handedness,
    MaterialId, PhysicsCommand, PhysicsRecorder, Pose, RenderCommand, RenderRecorder,
};

#[wasm_bindgen]
pub struct VizijHands {
    core: HandSystem<RenderRecorder, PhysicsRecorder>,
    inputs: [HandInput; 2],
    profiles: [Option<ControllerProfile>; 2],
    display: DisplayKind,
}

/// One tick's worth of output: both hand snapshots plus every backend
/// command queued during the tick.
#[derive(Serialize)]
struct Frame<'a> {
    hands: [&'a Hand; 2],
    render: Vec<RenderCommand>,
    physics: Vec<PhysicsCommand>,
}

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

fn handedness(raw: u32) -> Result<Handedness, JsError> {
    Handedness::try_from(raw).map_err(|e| JsError::new(&e.to_string()))
}

#[wasm_bindgen]
impl VizijHands {
    /// Create both hands. Pass a (partial) config object or undefined/null for defaults.
    /// Example:
    ///   new VizijHands({ blend_rate: 20, visible: false })
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<VizijHands, JsError> {
        #[cfg(feature = "console_error")]
        console_error_panic_hook::set_once();

        let cfg: HandConfig = if jsvalue_is_undefined_or_null(&config) {
            HandConfig::default()
        } else {
            swb::from_value(config).map_err(|e| JsError::new(&format!("config error: {e}")))?
        };
        let core = HandSystem::new(cfg, RenderRecorder::new(), PhysicsRecorder::new())
            .map_err(|e| JsError::new(&e.to_string()))?;

        Ok(VizijHands {
            core,
            inputs: Default::default(),
            profiles: [None, None],
            display: DisplayKind::Opaque,
        })
    }

    /// Stage the input used by the next `update` for one hand (0 = left, 1 = right).
    /// `input` is a HandInput object, e.g.
    ///   { kind: "simulated_from_buttons", palm: {...}, tracked: true, trigger: true, grip: false }
    #[wasm_bindgen(js_name = set_input)]
    pub fn set_input(&mut self, handed: u32, input: JsValue) -> Result<(), JsError> {
        let h = handedness(handed)?;
        let input: HandInput =
            swb::from_value(input).map_err(|e| JsError::new(&format!("input error: {e}")))?;
        self.inputs[h.index()] = input;
        Ok(())
    }

    /// Switch the controller profile used by `set_controller`. Unknown paths
    /// keep the current profile. Returns true when the profile changed.
    #[wasm_bindgen(js_name = set_controller_profile)]
    pub fn set_controller_profile(&mut self, handed: u32, path: &str) -> Result<bool, JsError> {
        let h = handedness(handed)?;
        Ok(ControllerProfile::switch(&mut self.profiles[h.index()], h, path))
    }

    /// See-through displays hold Microsoft motion controllers differently.
    #[wasm_bindgen(js_name = set_see_through)]
    pub fn set_see_through(&mut self, see_through: bool) {
        self.display = if see_through {
            DisplayKind::SeeThrough
        } else {
            DisplayKind::Opaque
        };
    }

    /// Stage simulated input from a controller grip pose and its buttons.
    /// The grip pose is converted to a palm pose with the active profile.
    #[wasm_bindgen(js_name = set_controller)]
    pub fn set_controller(
        &mut self,
        handed: u32,
        grip_pose: JsValue,
        tracked: bool,
        trigger: bool,
        grip: bool,
    ) -> Result<(), JsError> {
        let h = handedness(handed)?;
        let grip_pose: Pose =
            swb::from_value(grip_pose).map_err(|e| JsError::new(&format!("pose error: {e}")))?;
        let palm = match self.profiles[h.index()] {
            Some(profile) => profile.palm_from_grip(h, self.display, &grip_pose),
            None => grip_pose,
        };
        self.inputs[h.index()] = HandInput::SimulatedFromButtons {
            palm,
            tracked,
            trigger,
            grip,
        };
        Ok(())
    }

    /// Step both hands by dt (unscaled seconds). Returns the frame as JSON.
    #[wasm_bindgen]
    pub fn update(&mut self, dt: f32) -> Result<String, JsError> {
        self.core.update(dt, &self.inputs);
        let render = self.core.render_mut().drain();
        let physics = self.core.physics_mut().drain();
        let frame = Frame {
            hands: [
                self.core.hand(Handedness::Left),
                self.core.hand(Handedness::Right),
            ],
            render,
            physics,
        };
        serde_json::to_string(&frame).map_err(|e| JsError::new(&format!("frame error: {e}")))
    }

    /// Current snapshot of one hand.
    #[wasm_bindgen]
    pub fn hand(&self, handed: u32) -> Result<JsValue, JsError> {
        let h = handedness(handed)?;
        swb::to_value(self.core.hand(h)).map_err(|e| JsError::new(&format!("hand error: {e}")))
    }

    /// State bitset (tracked = 1, just tracked = 2, untracked = 4, pinch = 8, ...).
    #[wasm_bindgen]
    pub fn state(&self, handed: u32) -> Result<u32, JsError> {
        Ok(self.core.state(handedness(handed)?).bits())
    }

    #[wasm_bindgen(js_name = set_visible)]
    pub fn set_visible(&mut self, handed: u32, visible: bool) -> Result<(), JsError> {
        self.core.set_visible(handedness(handed)?, visible);
        Ok(())
    }

    #[wasm_bindgen(js_name = set_solid)]
    pub fn set_solid(&mut self, handed: u32, solid: bool) -> Result<(), JsError> {
        self.core.set_solid(handedness(handed)?, solid);
        Ok(())
    }

    /// Replace the skin material by id; undefined/null hides the skin.
    #[wasm_bindgen(js_name = set_material)]
    pub fn set_material(&mut self, handed: u32, material: Option<u32>) -> Result<(), JsError> {
        self.core
            .set_material(handedness(handed)?, material.map(MaterialId));
        Ok(())
    }

    /// Flat xyz positions of the hand mesh (empty until first drawn).
    #[wasm_bindgen(js_name = mesh_positions)]
    pub fn mesh_positions(&self, handed: u32) -> Result<Float32Array, JsError> {
        let mesh = self.core.mesh(handedness(handed)?);
        let flat: Vec<f32> = mesh.vertices().iter().flat_map(|v| v.position).collect();
        Ok(Float32Array::from(flat.as_slice()))
    }

    #[wasm_bindgen(js_name = mesh_indices)]
    pub fn mesh_indices(&self, handed: u32) -> Result<Uint16Array, JsError> {
        let mesh = self.core.mesh(handedness(handed)?);
        Ok(Uint16Array::from(mesh.indices()))
    }

    /// Release proxies, materials and meshes. Later updates are no-ops.
    #[wasm_bindgen]
    pub fn shutdown(&mut self) {
        self.core.shutdown();
    }
}

/// Numeric ABI version for compatibility checks at init.
#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}
