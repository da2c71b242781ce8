//! The collection of yards and the active-yard pointer

use log::{debug, info};

use crate::error::EditorError;
use crate::model::{generate_id, ContainerType, Yard};
use crate::units::Unit;

/// Every yard the user has, plus which one is open
#[derive(Debug, Clone, Default, PartialEq)]
pub struct YardBook {
    yards: Vec<Yard>,
    active_yard_id: Option<String>,
}

impl YardBook {
    /// Build a book from loaded yards. A stale or missing active id falls
    /// back to the first yard.
    pub fn new(yards: Vec<Yard>, active_yard_id: Option<String>) -> Self {
        let mut book = Self {
            yards,
            active_yard_id,
        };
        book.ensure_active_yard();
        book
    }

    pub fn yards(&self) -> &[Yard] {
        &self.yards
    }

    pub fn into_yards(self) -> Vec<Yard> {
        self.yards
    }

    pub fn is_empty(&self) -> bool {
        self.yards.is_empty()
    }

    pub fn active_yard_id(&self) -> Option<&str> {
        self.active_yard().map(|yard| yard.id.as_str())
    }

    pub fn yard(&self, id: &str) -> Option<&Yard> {
        self.yards.iter().find(|yard| yard.id == id)
    }

    pub fn yard_mut(&mut self, id: &str) -> Option<&mut Yard> {
        self.yards.iter_mut().find(|yard| yard.id == id)
    }

    /// The open yard; falls back to the first yard, `None` when empty
    pub fn active_yard(&self) -> Option<&Yard> {
        self.active_yard_id
            .as_deref()
            .and_then(|id| self.yard(id))
            .or_else(|| self.yards.first())
    }

    pub fn active_yard_mut(&mut self) -> Option<&mut Yard> {
        self.ensure_active_yard();
        let id = self.active_yard_id.clone()?;
        self.yard_mut(&id)
    }

    pub fn set_active_yard(&mut self, id: &str) -> Result<(), EditorError> {
        if self.yard(id).is_none() {
            return Err(EditorError::not_found("yard", id));
        }
        self.active_yard_id = Some(id.to_string());
        Ok(())
    }

    fn ensure_active_yard(&mut self) {
        let valid = self
            .active_yard_id
            .as_deref()
            .is_some_and(|id| self.yards.iter().any(|yard| yard.id == id));
        if !valid {
            self.active_yard_id = self.yards.first().map(|yard| yard.id.clone());
        }
    }

    fn require_index(&self, id: &str) -> Result<usize, EditorError> {
        self.yards
            .iter()
            .position(|yard| yard.id == id)
            .ok_or_else(|| EditorError::not_found("yard", id))
    }

    /// Create a yard and open it. Default rates are carried over from the
    /// yard that was open; a blank name becomes "Yard N".
    pub fn create_yard(
        &mut self,
        name: &str,
        width: f64,
        height: f64,
        unit: Unit,
        catalog: &[ContainerType],
    ) -> Result<String, EditorError> {
        let name = match name.trim() {
            "" => format!("Yard {}", self.yards.len() + 1),
            trimmed => trimmed.to_string(),
        };
        let mut yard = Yard::new(&name, width, height, unit, catalog)?;
        if let Some(template) = self.active_yard() {
            for (key, rate) in yard.default_rates.iter_mut() {
                if let Some(previous) = template.default_rates.get(key) {
                    rate.clone_from(previous);
                }
            }
        }
        let id = yard.id.clone();
        info!("created yard '{}' ({} x {} {})", yard.name, yard.width, yard.height, yard.unit);
        self.yards.push(yard);
        self.active_yard_id = Some(id.clone());
        Ok(id)
    }

    pub fn rename_yard(&mut self, id: &str, name: &str) -> Result<(), EditorError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(EditorError::invalid("yard name", "must not be blank"));
        }
        let index = self.require_index(id)?;
        self.yards[index].name = trimmed.to_string();
        Ok(())
    }

    /// Copy a yard under "<name> Copy" and open the copy.
    ///
    /// Yard, layers, containers and doors get fresh ids; custom field ids are
    /// kept so container values stay attached. The copy opens on the layer
    /// whose name matches the original's active layer.
    pub fn duplicate_yard(&mut self, id: &str) -> Result<String, EditorError> {
        let index = self.require_index(id)?;
        let source = &self.yards[index];
        let active_layer_name = source.active_layer().map(|layer| layer.name.clone());

        let mut copy = source.clone();
        copy.id = generate_id();
        copy.name = format!("{} Copy", source.name);
        for layer in &mut copy.layers {
            layer.id = generate_id();
            for container in &mut layer.containers {
                container.id = generate_id();
                for door in &mut container.doors {
                    door.id = generate_id();
                }
            }
        }
        copy.active_layer_id = copy
            .layers
            .iter()
            .find(|layer| Some(&layer.name) == active_layer_name.as_ref())
            .or_else(|| copy.layers.first())
            .map(|layer| layer.id.clone())
            .unwrap_or_default();
        copy.reconcile_custom_values();
        copy.refresh_next_container_number();

        let copy_id = copy.id.clone();
        debug!("duplicated yard '{}' as '{}'", source.name, copy.name);
        self.yards.push(copy);
        self.active_yard_id = Some(copy_id.clone());
        Ok(copy_id)
    }

    /// Delete a yard; if it was open, the first remaining yard opens
    pub fn delete_yard(&mut self, id: &str) -> Result<Yard, EditorError> {
        let index = self.require_index(id)?;
        let removed = self.yards.remove(index);
        if self.active_yard_id.as_deref() == Some(id) {
            self.active_yard_id = self.yards.first().map(|yard| yard.id.clone());
        }
        info!("deleted yard '{}'", removed.name);
        Ok(removed)
    }
}
