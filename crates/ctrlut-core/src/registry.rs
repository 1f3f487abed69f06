//! The per-document registry of LUT tables.

use crate::config::EditorConfig;
use crate::confirm::{Confirm, Removal, removal_prompt};
use crate::error::LutError;
use crate::naming::disambiguate;
use crate::render::RenderBridge;
use crate::table::{LutTable, TableEditor, rebind_shared_name};

/// Ordered, uniquely named tables of one open asset document.
///
/// Insertion order is display order. The registry holds the document's
/// [`RenderBridge`] for as long as the document is open and routes every
/// structural change through it.
#[derive(Debug)]
pub struct LutRegistry {
    tables: Vec<LutTable>,
    bridge: RenderBridge,
    config: EditorConfig,
}

impl LutRegistry {
    pub fn new(bridge: RenderBridge, config: EditorConfig) -> Self {
        Self {
            tables: Vec::new(),
            bridge,
            config,
        }
    }

    /// Build the registry for a freshly loaded document and bind every
    /// sampler in the renderer's active map.
    pub fn load(tables: Vec<LutTable>, bridge: RenderBridge, config: EditorConfig) -> Self {
        let mut registry = Self::new(bridge, config);
        for table in tables {
            registry.insert(table);
        }
        tracing::info!(tables = registry.len(), "loaded LUT registry");
        registry
    }

    pub fn bridge(&self) -> &RenderBridge {
        &self.bridge
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// All tables in display order, as handed to the document writer.
    pub fn tables(&self) -> &[LutTable] {
        &self.tables
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tables.iter().map(LutTable::name)
    }

    pub fn table(&self, name: &str) -> Option<&LutTable> {
        self.tables.iter().find(|t| t.name() == name)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Borrow one table for editing.
    pub fn editor(&mut self, name: &str) -> Result<TableEditor<'_>, LutError> {
        let Self {
            tables,
            bridge,
            config,
        } = self;
        let unknown = || LutError::UnknownTable(name.to_string());
        let index = tables.iter().position(|t| t.name() == name).ok_or_else(unknown)?;
        let (before, rest) = tables.split_at_mut(index);
        let (table, after) = rest.split_first_mut().ok_or_else(unknown)?;
        Ok(TableEditor::new(table, bridge, config).with_siblings(before, after))
    }

    /// Append an empty table under the default name, suffixed if taken.
    pub fn create(&mut self) -> String {
        let name = self.insert(LutTable::new(self.config.default_table_name.as_str()));
        tracing::info!(table = %name, "created LUT table");
        name
    }

    /// Insert a decoded table, renaming it if a sibling already uses its name.
    pub fn import(&mut self, table: LutTable) -> String {
        let name = self.insert(table);
        tracing::info!(table = %name, "imported LUT table");
        name
    }

    /// Swap a table's samplers for those of `replacement`, keeping the
    /// current table name.
    pub fn replace(&mut self, name: &str, replacement: LutTable) -> Result<(), LutError> {
        let index = self.position(name)?;
        let mut replacement = replacement;
        replacement.normalize_names();
        replacement.set_name(name.to_string());
        let previous = std::mem::replace(&mut self.tables[index], replacement);

        for sampler in previous.samplers() {
            self.bridge.evict(sampler.name());
        }
        self.sync_table(index);
        for sampler in previous.samplers() {
            if self.tables[index].sampler(sampler.name()).is_none() {
                rebind_shared_name(&self.bridge, sampler.name(), &self.tables);
            }
        }
        tracing::info!(table = name, samplers = self.tables[index].len(), "replaced LUT table");
        Ok(())
    }

    /// Rename a table. Sampler render entries are keyed by sampler name and
    /// stay as they are.
    pub fn rename(&mut self, old_name: &str, new_name: &str) -> Result<String, LutError> {
        let index = self.position(old_name)?;
        let assigned = disambiguate(
            new_name,
            self.tables
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != index)
                .map(|(_, t)| t.name()),
        );
        self.tables[index].set_name(assigned.clone());
        tracing::info!(from = old_name, to = %assigned, "renamed LUT table");
        Ok(assigned)
    }

    /// Detach a table and evict every sampler it owns from both render maps.
    pub fn remove(&mut self, name: &str) -> Option<LutTable> {
        let index = self.position(name).ok()?;
        let table = self.tables.remove(index);
        for sampler in table.samplers() {
            self.bridge.evict(sampler.name());
            rebind_shared_name(&self.bridge, sampler.name(), &self.tables);
        }
        tracing::info!(table = name, samplers = table.len(), "removed LUT table");
        Some(table)
    }

    /// Remove every selected table after a single confirmation.
    pub fn remove_selected(&mut self, selection: &[&str], confirm: &mut impl Confirm) -> Removal {
        let targets: Vec<&str> = self.names().filter(|name| selection.contains(name)).collect();
        if targets.is_empty() {
            return Removal::NothingSelected;
        }
        if !confirm.confirm(&removal_prompt(&targets)) {
            tracing::warn!(count = targets.len(), "LUT table removal declined");
            return Removal::Declined;
        }

        let targets: Vec<String> = targets.into_iter().map(str::to_string).collect();
        for name in &targets {
            self.remove(name);
        }
        Removal::Removed(targets)
    }

    pub fn into_tables(self) -> Vec<LutTable> {
        self.tables
    }

    fn insert(&mut self, mut table: LutTable) -> String {
        let base = if table.name().trim().is_empty() {
            self.config.default_table_name.clone()
        } else {
            table.name().to_string()
        };
        let name = disambiguate(&base, self.names());
        table.set_name(name.clone());
        table.normalize_names();
        self.tables.push(table);
        self.sync_table(self.tables.len() - 1);
        name
    }

    fn sync_table(&self, index: usize) {
        for sampler in self.tables[index].samplers() {
            self.bridge.sync(None, sampler);
        }
    }

    fn position(&self, name: &str) -> Result<usize, LutError> {
        self.tables
            .iter()
            .position(|t| t.name() == name)
            .ok_or_else(|| LutError::UnknownTable(name.to_string()))
    }
}
