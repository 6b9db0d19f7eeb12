//! Per-state material tables with opacity synchronization.
//!
//! A [`MaterialStateSet`] maps `state × selected` to a [`StateMaterial`]. Slots
//! that are not supplied alias the `normal` entry by reference, so changes to
//! the normal material show through every alias.

use crate::error::MaterialSetError;
use crate::state::{ClickableState, MaterialSlot};
use raypick_scene::{MaterialHandle, VisualResource};
use std::rc::Rc;

/// A visual resource together with the opacities it had when it was assigned
#[derive(Debug)]
pub struct StateMaterial {
    resource: VisualResource,
    original_opacity: Vec<f32>,
}

impl StateMaterial {
    /// Wrap `resource`, recording the current opacity of each material
    pub fn new(resource: impl Into<VisualResource>) -> Self {
        let resource = resource.into();
        let original_opacity = resource.opacities();
        Self {
            resource,
            original_opacity,
        }
    }

    /// The wrapped resource
    pub fn resource(&self) -> &VisualResource {
        &self.resource
    }

    /// Opacities recorded at construction, one per material
    pub fn original_opacity(&self) -> &[f32] {
        &self.original_opacity
    }

    /// Scale every material's opacity to `global_alpha * original`
    pub fn set_opacity(&self, global_alpha: f32) {
        for (handle, original) in self.materials().iter().zip(&self.original_opacity) {
            handle.borrow_mut().opacity = global_alpha * original;
        }
    }

    fn materials(&self) -> &[MaterialHandle] {
        self.resource.materials()
    }
}

/// Slot contents supplied when building a [`MaterialStateSet`]
#[derive(Debug, Default)]
pub struct MaterialSlots {
    /// Mandatory idle material
    pub normal: Option<StateMaterial>,
    /// Hovered
    pub over: Option<StateMaterial>,
    /// Pressed
    pub down: Option<StateMaterial>,
    /// Disabled
    pub disable: Option<StateMaterial>,
    /// Selected, idle
    pub normal_select: Option<StateMaterial>,
    /// Selected, hovered
    pub over_select: Option<StateMaterial>,
    /// Selected, pressed
    pub down_select: Option<StateMaterial>,
}

impl MaterialSlots {
    /// Slots with only `normal` set
    pub fn with_normal(normal: StateMaterial) -> Self {
        Self {
            normal: Some(normal),
            ..Default::default()
        }
    }

    /// Builder: fill one slot
    pub fn with(mut self, slot: MaterialSlot, material: StateMaterial) -> Self {
        let target = match slot {
            MaterialSlot::Normal => &mut self.normal,
            MaterialSlot::Over => &mut self.over,
            MaterialSlot::Down => &mut self.down,
            MaterialSlot::Disable => &mut self.disable,
            MaterialSlot::NormalSelect => &mut self.normal_select,
            MaterialSlot::OverSelect => &mut self.over_select,
            MaterialSlot::DownSelect => &mut self.down_select,
        };
        *target = Some(material);
        self
    }
}

/// Table of materials keyed by interaction state and selection
#[derive(Debug, Clone)]
pub struct MaterialStateSet {
    normal: Rc<StateMaterial>,
    over: Rc<StateMaterial>,
    down: Rc<StateMaterial>,
    disable: Rc<StateMaterial>,
    normal_select: Rc<StateMaterial>,
    over_select: Rc<StateMaterial>,
    down_select: Rc<StateMaterial>,
}

impl MaterialStateSet {
    /// Build a set. Fails when `normal` is missing; other missing slots share
    /// the normal entry.
    pub fn new(slots: MaterialSlots) -> Result<Self, MaterialSetError> {
        let normal = Rc::new(slots.normal.ok_or(MaterialSetError::MissingNormal)?);
        let or_normal = |slot: Option<StateMaterial>| match slot {
            Some(material) => Rc::new(material),
            None => Rc::clone(&normal),
        };

        Ok(Self {
            over: or_normal(slots.over),
            down: or_normal(slots.down),
            disable: or_normal(slots.disable),
            normal_select: or_normal(slots.normal_select),
            over_select: or_normal(slots.over_select),
            down_select: or_normal(slots.down_select),
            normal,
        })
    }

    /// Set with a single material used for every state
    pub fn single(normal: impl Into<VisualResource>) -> Self {
        let normal = Rc::new(StateMaterial::new(normal));
        Self {
            over: Rc::clone(&normal),
            down: Rc::clone(&normal),
            disable: Rc::clone(&normal),
            normal_select: Rc::clone(&normal),
            over_select: Rc::clone(&normal),
            down_select: Rc::clone(&normal),
            normal,
        }
    }

    /// Entry stored in `slot`
    pub fn slot(&self, slot: MaterialSlot) -> &Rc<StateMaterial> {
        match slot {
            MaterialSlot::Normal => &self.normal,
            MaterialSlot::Over => &self.over,
            MaterialSlot::Down => &self.down,
            MaterialSlot::Disable => &self.disable,
            MaterialSlot::NormalSelect => &self.normal_select,
            MaterialSlot::OverSelect => &self.over_select,
            MaterialSlot::DownSelect => &self.down_select,
        }
    }

    /// Material for the given state. A disabled object always gets the
    /// `disable` slot, whatever its state or selection.
    pub fn get_material(
        &self,
        state: ClickableState,
        mouse_enabled: bool,
        selected: bool,
    ) -> &Rc<StateMaterial> {
        if !mouse_enabled {
            return &self.disable;
        }
        self.slot(MaterialSlot::for_state(state, selected))
    }

    /// Like [`get_material`](Self::get_material) with a string state key;
    /// unknown keys resolve to `normal`.
    pub fn get_material_by_key(
        &self,
        key: &str,
        mouse_enabled: bool,
        selected: bool,
    ) -> &Rc<StateMaterial> {
        match ClickableState::from_key(key) {
            Some(state) => self.get_material(state, mouse_enabled, selected),
            None if !mouse_enabled => &self.disable,
            None => &self.normal,
        }
    }

    /// Distinct entries; aliased slots appear once
    pub fn distinct_slots(&self) -> Vec<&Rc<StateMaterial>> {
        let mut distinct: Vec<&Rc<StateMaterial>> = Vec::with_capacity(MaterialSlot::ALL.len());
        for slot in MaterialSlot::ALL {
            let entry = self.slot(slot);
            if !distinct.iter().any(|seen| Rc::ptr_eq(seen, entry)) {
                distinct.push(entry);
            }
        }
        distinct
    }

    /// Scale every material to `global_alpha` times its recorded opacity
    pub fn set_opacity(&self, global_alpha: f32) {
        for entry in self.distinct_slots() {
            entry.set_opacity(global_alpha);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use raypick_scene::Material;

    fn mat(label: &str, opacity: f32) -> StateMaterial {
        StateMaterial::new(Material::new(label, [1.0; 4]).with_opacity(opacity))
    }

    fn full_set() -> MaterialStateSet {
        MaterialStateSet::new(
            MaterialSlots::with_normal(mat("normal", 1.0))
                .with(MaterialSlot::Over, mat("over", 1.0))
                .with(MaterialSlot::Down, mat("down", 1.0))
                .with(MaterialSlot::Disable, mat("disable", 0.5))
                .with(MaterialSlot::NormalSelect, mat("normal_select", 1.0))
                .with(MaterialSlot::OverSelect, mat("over_select", 1.0))
                .with(MaterialSlot::DownSelect, mat("down_select", 1.0)),
        )
        .unwrap()
    }

    fn label(entry: &StateMaterial) -> String {
        entry.resource().materials()[0].borrow().label.clone()
    }

    #[test]
    fn missing_normal_is_an_error() {
        let err = MaterialStateSet::new(MaterialSlots::default().with(MaterialSlot::Over, mat("over", 1.0)))
            .unwrap_err();
        assert_eq!(err, MaterialSetError::MissingNormal);
    }

    #[test]
    fn only_normal_aliases_every_slot() {
        let set = MaterialStateSet::new(MaterialSlots::with_normal(mat("normal", 1.0))).unwrap();
        let normal = set.slot(MaterialSlot::Normal);
        for slot in MaterialSlot::ALL {
            assert!(Rc::ptr_eq(set.slot(slot), normal), "{slot:?} is not aliased");
        }
        assert_eq!(set.distinct_slots().len(), 1);
    }

    #[test]
    fn disabled_wins_over_state_and_selection() {
        let set = full_set();
        for state in [
            ClickableState::Normal,
            ClickableState::Over,
            ClickableState::Down,
            ClickableState::Disable,
        ] {
            for selected in [false, true] {
                assert_eq!(label(set.get_material(state, false, selected)), "disable");
            }
        }
    }

    #[test]
    fn enabled_lookup_uses_state_and_selection() {
        let set = full_set();
        assert_eq!(label(set.get_material(ClickableState::Over, true, false)), "over");
        assert_eq!(label(set.get_material(ClickableState::Down, true, true)), "down_select");
        assert_eq!(label(set.get_material(ClickableState::Normal, true, true)), "normal_select");
    }

    #[test]
    fn unknown_key_falls_back_to_normal() {
        let set = full_set();
        assert_eq!(label(set.get_material_by_key("hover", true, true)), "normal");
        assert_eq!(label(set.get_material_by_key("hover", false, true)), "disable");
        assert_eq!(label(set.get_material_by_key("down", true, false)), "down");
    }

    #[test]
    fn opacity_scales_aliases_once() {
        let set = MaterialStateSet::new(MaterialSlots::with_normal(mat("normal", 0.6))).unwrap();
        set.set_opacity(0.5);

        let over = set.get_material(ClickableState::Over, true, false);
        assert!((over.resource().opacities()[0] - 0.3).abs() < 1e-6);
        let normal = set.get_material(ClickableState::Normal, true, false);
        assert!((normal.resource().opacities()[0] - 0.3).abs() < 1e-6);
    }

    #[test]
    fn opacity_restores_originals() {
        let set = full_set();
        set.set_opacity(0.2);
        set.set_opacity(1.0);
        for entry in set.distinct_slots() {
            assert_eq!(entry.resource().opacities(), entry.original_opacity());
        }
        assert_eq!(
            set.slot(MaterialSlot::Disable).resource().opacities(),
            vec![0.5]
        );
    }

    #[test]
    fn array_resources_keep_per_element_originals() {
        let parts = vec![
            Material::new("front", [1.0; 4]).with_opacity(1.0).into_handle(),
            Material::new("back", [1.0; 4]).with_opacity(0.4).into_handle(),
        ];
        let set = MaterialStateSet::single(parts);
        set.set_opacity(0.5);
        let opacities = set.slot(MaterialSlot::Normal).resource().opacities();
        assert!((opacities[0] - 0.5).abs() < 1e-6);
        assert!((opacities[1] - 0.2).abs() < 1e-6);
    }
}
