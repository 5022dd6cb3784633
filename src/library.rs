use std::sync::Arc;

use glam::Vec3;
use parking_lot::RwLock;

use crate::material::{valid_shininess, Material, MaterialSet, ShadingCoefficients};
use crate::space::{Light, Position, WorldSpace};
use crate::texture::SamplerPolicy;

/// Thread-safe material store. Clones share the same state, so parameters
/// can be retuned from one thread while a renderer snapshots them on another.
#[derive(Debug, Default)]
pub struct MaterialLibrary {
    inner: Arc<RwLock<MaterialSet>>,
}

impl Clone for MaterialLibrary {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl MaterialLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_set(set: MaterialSet) -> Self {
        Self {
            inner: Arc::new(RwLock::new(set)),
        }
    }

    /// Replaces the whole library with a freshly loaded set.
    pub fn replace(&self, set: MaterialSet) {
        *self.inner.write() = set;
    }

    /// Returns a snapshot of the stored materials and light.
    pub fn snapshot(&self) -> MaterialSet {
        self.inner.read().clone()
    }

    pub fn all(&self) -> Vec<Material> {
        self.inner.read().materials.clone()
    }

    pub fn len(&self) -> usize {
        self.inner.read().materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, name: &str) -> Option<Material> {
        self.inner
            .read()
            .materials
            .iter()
            .find(|material| material.name == name)
            .cloned()
    }

    /// Applies a mutation to the named material.
    pub fn update<F, R>(&self, name: &str, mut updater: F) -> Option<R>
    where
        F: FnMut(&mut Material) -> R,
    {
        let mut guard = self.inner.write();
        let material = guard
            .materials
            .iter_mut()
            .find(|material| material.name == name)?;
        Some(updater(material))
    }

    pub fn world_light(&self) -> Light<WorldSpace> {
        self.inner.read().world_light()
    }

    /// Non-finite positions are ignored and reported as not applied.
    pub fn set_light(&self, position: Position<WorldSpace>) -> bool {
        if !position.vec().is_finite() {
            return false;
        }
        self.inner.write().light = position.vec();
        true
    }

    pub fn set_coefficients(&self, name: &str, coefficients: ShadingCoefficients) -> bool {
        if !coefficients.is_valid() {
            return false;
        }
        self.update(name, |material| material.coefficients = coefficients)
            .is_some()
    }

    /// Ignores non-positive or non-finite exponents and reports them as not
    /// applied.
    pub fn set_shininess(&self, name: &str, shininess: f32) -> bool {
        if !valid_shininess(shininess) {
            return false;
        }
        self.update(name, |material| material.coefficients.shininess = shininess)
            .is_some()
    }

    pub fn set_color(&self, name: &str, color: Vec3) -> bool {
        self.update(name, |material| material.color = color).is_some()
    }

    pub fn set_sampler(&self, name: &str, sampler: SamplerPolicy) -> bool {
        self.update(name, |material| material.sampler = sampler).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::PipelineKind;
    use crate::texture::{Address, Filter};

    fn library() -> MaterialLibrary {
        MaterialLibrary::from_set(MaterialSet {
            materials: vec![
                Material::new("Earth", PipelineKind::CameraLitSpecular),
                Material::new("Orbit", PipelineKind::UnlitColored),
            ],
            light: Vec3::ZERO,
        })
    }

    #[test]
    fn replace_and_get_material() {
        let library = library();
        assert!(library.get("Earth").is_some());
        library.replace(MaterialSet {
            materials: vec![Material::new("Sun", PipelineKind::UnlitTextured)],
            light: Vec3::Y,
        });
        assert!(library.get("Earth").is_none());
        assert_eq!(library.len(), 1);
        assert_eq!(library.world_light().position.vec(), Vec3::Y);
    }

    #[test]
    fn updates_are_visible_through_clones() {
        let library = library();
        let handle = library.clone();
        assert!(handle.set_shininess("Earth", 4.0));
        assert_eq!(library.get("Earth").unwrap().coefficients.shininess, 4.0);

        assert!(handle.set_light(Position::from_xyz(1.0, 2.0, 3.0)));
        assert_eq!(library.snapshot().light, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn updates_from_another_thread() {
        let library = library();
        let handle = library.clone();
        std::thread::spawn(move || {
            handle.set_color("Orbit", Vec3::new(1.0, 0.0, 0.0));
            handle.set_sampler("Orbit", SamplerPolicy::new(Filter::Linear, Address::Repeat));
        })
        .join()
        .unwrap();
        let orbit = library.get("Orbit").unwrap();
        assert_eq!(orbit.color, Vec3::X);
        assert_eq!(orbit.sampler.filter, Filter::Linear);
    }

    #[test]
    fn rejects_missing_materials_and_bad_shininess() {
        let library = library();
        assert!(!library.set_shininess("Earth", 0.0));
        assert!(!library.set_shininess("Earth", f32::NAN));
        assert!(!library.set_shininess("Earth", f32::INFINITY));
        assert!(!library.set_shininess("Moon", 8.0));
        assert!(!library.set_coefficients("Moon", ShadingCoefficients::default()));
        let broken = ShadingCoefficients {
            ambient: f32::NAN,
            ..ShadingCoefficients::default()
        };
        assert!(!library.set_coefficients("Earth", broken));
        assert!(!library.set_light(Position::from_xyz(f32::INFINITY, 0.0, 0.0)));
        assert_eq!(library.snapshot().light, Vec3::ZERO);
        assert_eq!(
            library.get("Earth").unwrap().coefficients,
            ShadingCoefficients::default()
        );
    }
}
