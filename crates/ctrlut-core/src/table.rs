//! LUT tables: ordered sets of uniquely named samplers.
//!
//! [`LutTable`] is the plain data that gets serialized. All mutation goes
//! through a [`TableEditor`], which pairs the table with the document's
//! [`RenderBridge`] so each edit leaves the renderer's maps in sync.

use serde::{Deserialize, Serialize};

use crate::batch::{FieldValue, SamplerField};
use crate::codec::TABLE_LEN;
use crate::config::EditorConfig;
use crate::confirm::{Confirm, Removal, removal_prompt};
use crate::error::LutError;
use crate::naming::disambiguate;
use crate::raster::Raster;
use crate::render::RenderBridge;
use crate::sampler::{LutSampler, SamplerFlags};

/// A named look-up table holding samplers in display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LutTable {
    name: String,
    #[serde(default)]
    samplers: Vec<LutSampler>,
}

impl LutTable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            samplers: Vec::new(),
        }
    }

    /// Build a table, renaming samplers whose names collide with an earlier one.
    pub fn with_samplers(name: impl Into<String>, samplers: Vec<LutSampler>) -> Self {
        let mut table = Self::new(name);
        for sampler in samplers {
            table.push_unique(sampler);
        }
        table
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn samplers(&self) -> &[LutSampler] {
        &self.samplers
    }

    pub fn sampler(&self, name: &str) -> Option<&LutSampler> {
        self.samplers.iter().find(|s| s.name() == name)
    }

    pub fn sampler_names(&self) -> impl Iterator<Item = &str> {
        self.samplers.iter().map(LutSampler::name)
    }

    pub fn len(&self) -> usize {
        self.samplers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samplers.is_empty()
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }

    /// Re-establish unique sampler names, e.g. after deserializing.
    pub(crate) fn normalize_names(&mut self) {
        let samplers = std::mem::take(&mut self.samplers);
        for sampler in samplers {
            self.push_unique(sampler);
        }
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.samplers.iter().position(|s| s.name() == name)
    }

    fn push_unique(&mut self, mut sampler: LutSampler) -> usize {
        let name = disambiguate(sampler.name(), self.sampler_names());
        sampler.set_name(name);
        self.samplers.push(sampler);
        self.samplers.len() - 1
    }

    fn unknown(&self, sampler: &str) -> LutError {
        LutError::UnknownSampler {
            table: self.name.clone(),
            sampler: sampler.to_string(),
        }
    }
}

/// Mutable access to one table of an open document.
///
/// The other tables of the document are visible read-only so that a sampler
/// name shared across tables can be rebound after this table lets go of it.
#[derive(Debug)]
pub struct TableEditor<'a> {
    table: &'a mut LutTable,
    siblings: [&'a [LutTable]; 2],
    bridge: &'a RenderBridge,
    config: &'a EditorConfig,
}

impl<'a> TableEditor<'a> {
    pub(crate) fn new(
        table: &'a mut LutTable,
        bridge: &'a RenderBridge,
        config: &'a EditorConfig,
    ) -> Self {
        Self {
            table,
            siblings: [&[], &[]],
            bridge,
            config,
        }
    }

    /// Attach the tables before and after this one in the registry.
    pub(crate) fn with_siblings(mut self, before: &'a [LutTable], after: &'a [LutTable]) -> Self {
        self.siblings = [before, after];
        self
    }

    pub fn table(&self) -> &LutTable {
        self.table
    }

    pub fn config(&self) -> &'a EditorConfig {
        self.config
    }

    /// Append a zero-filled sampler under the default name, suffixed if taken.
    pub fn create_sampler(&mut self) -> String {
        let sampler = LutSampler::new(self.config.default_sampler_name.as_str());
        let name = self.insert(sampler);
        tracing::info!(table = self.table.name(), sampler = %name, "created LUT sampler");
        name
    }

    /// Insert an already decoded sampler, renaming it if its name is taken.
    ///
    /// An empty name falls back to the default sampler name.
    pub fn add_sampler(&mut self, mut sampler: LutSampler) -> String {
        if sampler.name().trim().is_empty() {
            sampler.set_name(self.config.default_sampler_name.clone());
        }
        let name = self.insert(sampler);
        tracing::info!(table = self.table.name(), sampler = %name, "imported LUT sampler");
        name
    }

    /// Decode `raster` into a new signed-domain sampler named after `name_hint`.
    pub fn import_sampler_raster(
        &mut self,
        name_hint: &str,
        raster: &Raster,
    ) -> Result<String, LutError> {
        let sampler = LutSampler::from_raster(
            name_hint,
            SamplerFlags::default(),
            raster,
            self.config.pair_policy,
        )?;
        Ok(self.add_sampler(sampler))
    }

    /// Detach one sampler and evict it from the render maps.
    pub fn remove_sampler(&mut self, name: &str) -> Option<LutSampler> {
        let index = self.table.position(name)?;
        let sampler = self.table.samplers.remove(index);
        self.bridge.evict(sampler.name());
        rebind_shared_name(self.bridge, name, self.siblings.iter().copied().flatten());
        tracing::info!(table = self.table.name(), sampler = name, "removed LUT sampler");
        Some(sampler)
    }

    /// Remove every selected sampler after a single confirmation.
    ///
    /// Unknown names in the selection are ignored.
    pub fn remove_selected(&mut self, selection: &[&str], confirm: &mut impl Confirm) -> Removal {
        let targets: Vec<&str> = self
            .table
            .sampler_names()
            .filter(|name| selection.contains(name))
            .collect();
        if targets.is_empty() {
            return Removal::NothingSelected;
        }
        if !confirm.confirm(&removal_prompt(&targets)) {
            tracing::warn!(
                table = self.table.name(),
                count = targets.len(),
                "sampler removal declined"
            );
            return Removal::Declined;
        }

        let targets: Vec<String> = targets.into_iter().map(str::to_string).collect();
        for name in &targets {
            self.remove_sampler(name);
        }
        Removal::Removed(targets)
    }

    /// Rename a sampler, suffixing `new_name` if a sibling already uses it.
    ///
    /// Returns the name actually assigned.
    pub fn rename_sampler(&mut self, old_name: &str, new_name: &str) -> Result<String, LutError> {
        let index = self
            .table
            .position(old_name)
            .ok_or_else(|| self.table.unknown(old_name))?;
        let assigned = disambiguate(
            new_name,
            self.table
                .samplers
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != index)
                .map(|(_, s)| s.name()),
        );

        let sampler = &mut self.table.samplers[index];
        sampler.set_name(assigned.clone());
        self.bridge.sync(Some(old_name), sampler);
        if assigned != old_name {
            rebind_shared_name(self.bridge, old_name, self.siblings.iter().copied().flatten());
        }
        tracing::info!(
            table = self.table.name(),
            from = old_name,
            to = %assigned,
            "renamed LUT sampler"
        );
        Ok(assigned)
    }

    /// Run an arbitrary content edit on one sampler, then resync it.
    ///
    /// The sampler keeps its name; renaming goes through
    /// [`Self::rename_sampler`].
    pub fn edit_sampler<R>(
        &mut self,
        name: &str,
        edit: impl FnOnce(&mut LutSampler) -> R,
    ) -> Result<R, LutError> {
        let index = self.table.position(name).ok_or_else(|| self.table.unknown(name))?;
        let sampler = &mut self.table.samplers[index];
        let result = edit(sampler);
        if sampler.name() != name {
            tracing::warn!(
                sampler = name,
                attempted = sampler.name(),
                "content edit tried to rename sampler; name restored"
            );
            sampler.set_name(name.to_string());
        }
        self.bridge.sync(None, sampler);
        Ok(result)
    }

    pub fn set_entry(&mut self, name: &str, index: usize, value: f32) -> Result<(), LutError> {
        if index >= TABLE_LEN {
            return Err(LutError::EntryOutOfRange(index));
        }
        self.edit_sampler(name, |sampler| sampler.table_mut().set(index, value))?
    }

    pub fn set_flags(&mut self, name: &str, flags: SamplerFlags) -> Result<(), LutError> {
        self.edit_sampler(name, |sampler| sampler.set_flags(flags))
    }

    /// Re-import a sampler's table from a raster using its current flags.
    ///
    /// A raster that fails to decode leaves the sampler and the render maps
    /// untouched.
    pub fn replace_sampler_raster(&mut self, name: &str, raster: &Raster) -> Result<(), LutError> {
        let policy = self.config.pair_policy;
        let index = self.table.position(name).ok_or_else(|| self.table.unknown(name))?;
        let sampler = &mut self.table.samplers[index];
        sampler.import_raster(raster, policy)?;
        self.bridge.sync(None, sampler);
        tracing::info!(
            table = self.table.name(),
            sampler = name,
            %raster,
            "replaced LUT sampler from raster"
        );
        Ok(())
    }

    /// Swap in flags and table from `replacement`, keeping the current name.
    pub fn replace_sampler(&mut self, name: &str, replacement: LutSampler) -> Result<(), LutError> {
        let index = self.table.position(name).ok_or_else(|| self.table.unknown(name))?;
        let sampler = &mut self.table.samplers[index];
        let mut replacement = replacement;
        replacement.set_name(name.to_string());
        *sampler = replacement;
        self.bridge.sync(None, sampler);
        tracing::info!(table = self.table.name(), sampler = name, "replaced LUT sampler");
        Ok(())
    }

    /// Apply one field update to every selected sampler.
    ///
    /// The update is validated against every target before any sampler is
    /// changed. Returns how many samplers were edited.
    pub fn batch_edit(
        &mut self,
        selection: &[&str],
        field: SamplerField,
        value: FieldValue,
    ) -> Result<usize, LutError> {
        let mut edited = Vec::new();
        for (index, sampler) in self.table.samplers.iter().enumerate() {
            if selection.contains(&sampler.name()) {
                let mut draft = sampler.clone();
                field.apply(&mut draft, value)?;
                edited.push((index, draft));
            }
        }

        let count = edited.len();
        for (index, draft) in edited {
            self.table.samplers[index] = draft;
            self.bridge.sync(None, &self.table.samplers[index]);
        }
        tracing::info!(
            table = self.table.name(),
            field = field.name(),
            count,
            "batch edited LUT samplers"
        );
        Ok(count)
    }

    fn insert(&mut self, sampler: LutSampler) -> String {
        let index = self.table.push_unique(sampler);
        let sampler = &self.table.samplers[index];
        self.bridge.sync(None, sampler);
        sampler.name().to_string()
    }
}

/// Rebind the first sampler in `tables` still called `name`.
///
/// Render entries are keyed by sampler name alone, so evicting a name can
/// unbind a same-named sampler that lives in another table.
pub(crate) fn rebind_shared_name<'t>(
    bridge: &RenderBridge,
    name: &str,
    tables: impl IntoIterator<Item = &'t LutTable>,
) {
    let survivor = tables.into_iter().find_map(|table| table.sampler(name));
    if let Some(sampler) = survivor {
        tracing::warn!(sampler = name, "sampler name shared across tables; rebinding survivor");
        bridge.sync(None, sampler);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{self, Domain};

    fn editor_parts() -> (LutTable, RenderBridge, EditorConfig) {
        (LutTable::new("LUT_Table"), RenderBridge::new(), EditorConfig::default())
    }

    #[test]
    fn test_create_sampler_names_are_distinct() {
        let (mut table, bridge, config) = editor_parts();
        let mut editor = TableEditor::new(&mut table, &bridge, &config);
        let names: Vec<String> = (0..5).map(|_| editor.create_sampler()).collect();
        assert_eq!(
            names,
            ["NewSampler", "NewSampler_1", "NewSampler_2", "NewSampler_3", "NewSampler_4"]
        );
        assert_eq!(bridge.active_names().len(), 5);
    }

    #[test]
    fn test_import_sampler_raster_disambiguates_hint() {
        let (mut table, bridge, config) = editor_parts();
        let mut editor = TableEditor::new(&mut table, &bridge, &config);
        let raster = codec::encode(&[0.5; 256], Domain::Signed, 1);

        assert_eq!(editor.import_sampler_raster("Rim", &raster).unwrap(), "Rim");
        assert_eq!(editor.import_sampler_raster("Rim", &raster).unwrap(), "Rim_1");
        assert_eq!(editor.import_sampler_raster("", &raster).unwrap(), "NewSampler");
    }

    #[test]
    fn test_import_bad_raster_inserts_nothing() {
        let (mut table, bridge, config) = editor_parts();
        let mut editor = TableEditor::new(&mut table, &bridge, &config);
        let raster = Raster::from_rgba(64, 1, vec![0; 64 * 4]);
        assert!(matches!(
            editor.import_sampler_raster("Rim", &raster),
            Err(LutError::InvalidDimensions { width: 64, .. })
        ));
        assert!(table.is_empty());
        assert!(bridge.active_names().is_empty());
    }

    #[test]
    fn test_rename_moves_render_entry() {
        let (mut table, bridge, config) = editor_parts();
        let mut editor = TableEditor::new(&mut table, &bridge, &config);
        let name = editor.create_sampler();
        editor.set_entry(&name, 0, 0.75).unwrap();

        let assigned = editor.rename_sampler(&name, "Fresnel").unwrap();
        assert_eq!(assigned, "Fresnel");
        assert!(!bridge.is_active(&name));
        let lut = bridge.active("Fresnel").unwrap();
        assert!(lut.matches(table.sampler("Fresnel").unwrap()));
    }

    #[test]
    fn test_rename_onto_sibling_is_suffixed_and_self_rename_is_kept() {
        let (mut table, bridge, config) = editor_parts();
        let mut editor = TableEditor::new(&mut table, &bridge, &config);
        let a = editor.create_sampler();
        let b = editor.create_sampler();
        let c = editor.create_sampler();
        assert_eq!(editor.rename_sampler(&c, &a).unwrap(), "NewSampler_2");
        assert_eq!(editor.rename_sampler(&a, &b).unwrap(), "NewSampler_1_1");
        assert_eq!(editor.rename_sampler(&b, &b).unwrap(), b);
        assert!(bridge.is_active(&b));
        assert!(bridge.is_active("NewSampler_1_1"));
        assert!(!bridge.is_active(&a));
    }

    #[test]
    fn test_rename_unknown_sampler_errors() {
        let (mut table, bridge, config) = editor_parts();
        let mut editor = TableEditor::new(&mut table, &bridge, &config);
        assert!(matches!(
            editor.rename_sampler("Ghost", "X"),
            Err(LutError::UnknownSampler { .. })
        ));
    }

    #[test]
    fn test_content_edit_rebuilds_render_entry() {
        let (mut table, bridge, config) = editor_parts();
        let mut editor = TableEditor::new(&mut table, &bridge, &config);
        let name = editor.create_sampler();
        editor.set_entry(&name, 10, 0.3).unwrap();
        editor.set_flags(&name, SamplerFlags::IS_ABSOLUTE).unwrap();

        let lut = bridge.active(&name).unwrap();
        assert_eq!(lut.domain(), Domain::Absolute);
        assert!((lut.values()[10] - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_content_edit_cannot_rename_sampler() {
        let (mut table, bridge, config) = editor_parts();
        let mut editor = TableEditor::new(&mut table, &bridge, &config);
        let a = editor.create_sampler();
        let b = editor.create_sampler();

        editor
            .edit_sampler(&a, |sampler| {
                *sampler = LutSampler::new(b.clone());
                sampler.table_mut().fill(0.4);
            })
            .unwrap();

        assert_eq!(table.sampler_names().collect::<Vec<_>>(), [a.as_str(), b.as_str()]);
        assert_eq!(bridge.active_names(), [a.clone(), b.clone()]);
        assert!(bridge.active(&a).unwrap().matches(table.sampler(&a).unwrap()));
        assert_eq!(table.sampler(&b).unwrap().table().get(0), Some(0.0));
    }

    #[test]
    fn test_set_entry_out_of_range_reports_error() {
        let (mut table, bridge, config) = editor_parts();
        let mut editor = TableEditor::new(&mut table, &bridge, &config);
        let name = editor.create_sampler();
        let before = bridge.active(&name).unwrap();
        assert!(matches!(
            editor.set_entry(&name, 300, 0.1),
            Err(LutError::EntryOutOfRange(300))
        ));
        assert!(std::sync::Arc::ptr_eq(&before, &bridge.active(&name).unwrap()));
    }

    #[test]
    fn test_replace_sampler_raster_failure_keeps_state() {
        let (mut table, bridge, config) = editor_parts();
        let mut editor = TableEditor::new(&mut table, &bridge, &config);
        let name = editor.create_sampler();
        editor.set_entry(&name, 1, 0.9).unwrap();
        let before = bridge.active(&name).unwrap();

        let bad = Raster::from_rgba(500, 2, vec![0; 500 * 2 * 4]);
        assert!(editor.replace_sampler_raster(&name, &bad).is_err());
        assert!(std::sync::Arc::ptr_eq(&before, &bridge.active(&name).unwrap()));
        assert!((table.sampler(&name).unwrap().table().get(1).unwrap() - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_replace_sampler_keeps_name() {
        let (mut table, bridge, config) = editor_parts();
        let mut editor = TableEditor::new(&mut table, &bridge, &config);
        let name = editor.create_sampler();
        let mut replacement = LutSampler::new("Other");
        replacement.table_mut().fill(1.0);
        editor.replace_sampler(&name, replacement).unwrap();

        let sampler = table.sampler(&name).unwrap();
        assert_eq!(sampler.table().get(0), Some(1.0));
        assert!(bridge.active(&name).unwrap().matches(sampler));
        assert!(!bridge.is_active("Other"));
    }

    #[test]
    fn test_remove_selected_declined_keeps_everything() {
        let (mut table, bridge, config) = editor_parts();
        let mut editor = TableEditor::new(&mut table, &bridge, &config);
        let a = editor.create_sampler();
        let b = editor.create_sampler();

        let mut asked = Vec::new();
        let outcome = editor.remove_selected(&[a.as_str(), b.as_str()], &mut |msg: &str| {
            asked.push(msg.to_string());
            false
        });
        assert_eq!(outcome, Removal::Declined);
        assert_eq!(asked.len(), 1);
        assert!(asked[0].contains("(2) selected nodes"));
        assert_eq!(table.len(), 2);
        assert_eq!(bridge.active_names().len(), 2);
    }

    #[test]
    fn test_remove_selected_confirmed_evicts() {
        let (mut table, bridge, config) = editor_parts();
        let mut editor = TableEditor::new(&mut table, &bridge, &config);
        let a = editor.create_sampler();
        let b = editor.create_sampler();
        let c = editor.create_sampler();

        let mut prompt = String::new();
        let outcome = editor.remove_selected(&[b.as_str(), "Ghost"], &mut |msg: &str| {
            prompt = msg.to_string();
            true
        });
        assert_eq!(outcome, Removal::Removed(vec![b.clone()]));
        assert!(prompt.contains(&b));
        assert_eq!(table.sampler_names().collect::<Vec<_>>(), [a.as_str(), c.as_str()]);
        assert!(!bridge.is_active(&b));
    }

    #[test]
    fn test_remove_selected_with_no_match_asks_nothing() {
        let (mut table, bridge, config) = editor_parts();
        let mut editor = TableEditor::new(&mut table, &bridge, &config);
        editor.create_sampler();
        let outcome =
            editor.remove_selected(&["Ghost"], &mut |_: &str| -> bool { panic!("asked") });
        assert_eq!(outcome, Removal::NothingSelected);
    }

    #[test]
    fn test_batch_edit_applies_to_selection_only() {
        let (mut table, bridge, config) = editor_parts();
        let mut editor = TableEditor::new(&mut table, &bridge, &config);
        let a = editor.create_sampler();
        let b = editor.create_sampler();
        let c = editor.create_sampler();

        let count = editor
            .batch_edit(&[a.as_str(), c.as_str()], SamplerField::Fill, FieldValue::Scalar(0.5))
            .unwrap();
        assert_eq!(count, 2);
        assert_eq!(table.sampler(&a).unwrap().table().get(9), Some(0.5));
        assert_eq!(table.sampler(&b).unwrap().table().get(9), Some(0.0));
        assert!(bridge.active(&c).unwrap().matches(table.sampler(&c).unwrap()));
    }

    #[test]
    fn test_batch_edit_type_mismatch_changes_nothing() {
        let (mut table, bridge, config) = editor_parts();
        let mut editor = TableEditor::new(&mut table, &bridge, &config);
        let a = editor.create_sampler();
        let before = table.clone();
        let mut editor = TableEditor::new(&mut table, &bridge, &config);
        assert!(
            editor
                .batch_edit(&[a.as_str()], SamplerField::Absolute, FieldValue::Scalar(1.0))
                .is_err()
        );
        assert_eq!(table, before);
    }

    #[test]
    fn test_with_samplers_dedups_names() {
        let table = LutTable::with_samplers("T", vec![LutSampler::new("S"), LutSampler::new("S")]);
        assert_eq!(table.sampler_names().collect::<Vec<_>>(), ["S", "S_1"]);
    }
}
