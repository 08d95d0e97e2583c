#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Tower system that owns every placed tower, validates placement requests and
//! runs tower components each tick.

use std::time::Duration;

use tower_defence_core::{
    CellCoord, Command, Event, PlacementError, PlacementPreview, TowerCatalogue, TowerId,
    TowerTypeId,
};
use tower_defence_world::{CombatContext, Enemy, Grid, Tower, TowerRegistry};
use tracing::{debug, info};

/// Owner of the placed towers and of the active build selection.
#[derive(Debug)]
pub struct TowerManager {
    registry: TowerRegistry,
    selected: Option<TowerTypeId>,
}

impl Default for TowerManager {
    fn default() -> Self {
        Self::new()
    }
}

impl TowerManager {
    /// Creates a manager without towers, with the cannon selected.
    #[must_use]
    pub fn new() -> Self {
        Self {
            registry: TowerRegistry::new(),
            selected: Some(TowerTypeId::Cannon),
        }
    }

    /// Tower type used by click placements.
    #[must_use]
    pub const fn selected(&self) -> Option<TowerTypeId> {
        self.selected
    }

    /// Placed towers in identifier order.
    #[must_use]
    pub const fn towers(&self) -> &TowerRegistry {
        &self.registry
    }

    /// Placed towers, mutably.
    pub fn registry_mut(&mut self) -> &mut TowerRegistry {
        &mut self.registry
    }

    /// Makes the tower type the active selection.
    ///
    /// Returns `false` when the catalogue has no such entry.
    pub fn select(
        &mut self,
        kind: TowerTypeId,
        catalogue: &TowerCatalogue,
        out: &mut Vec<Event>,
    ) -> bool {
        let Some(entry) = catalogue.get_kind(kind) else {
            debug!(%kind, "selected tower type is not in the catalogue");
            return false;
        };
        self.selected = Some(kind);
        out.push(Event::TowerSelected {
            kind,
            cost: entry.cost,
        });
        true
    }

    /// Selects a tower type by its catalogue key, ignoring case.
    pub fn select_by_name(
        &mut self,
        name: &str,
        catalogue: &TowerCatalogue,
        out: &mut Vec<Event>,
    ) -> Result<TowerTypeId, PlacementError> {
        let kind = catalogue
            .get(name)
            .map(|entry| entry.id)
            .ok_or_else(|| PlacementError::UnknownTowerType(name.to_owned()))?;
        let _ = self.select(kind, catalogue, out);
        Ok(kind)
    }

    /// Selects the tower type bound to the digit key.
    pub fn handle_hotkey(
        &mut self,
        digit: u8,
        catalogue: &TowerCatalogue,
        out: &mut Vec<Event>,
    ) -> bool {
        match TowerTypeId::from_hotkey(digit) {
            Some(kind) => self.select(kind, catalogue, out),
            None => false,
        }
    }

    /// Validates and performs a placement.
    ///
    /// Rejections leave every piece of state untouched and are reported as
    /// [`Event::PlacementRejected`]. The gold is not deducted here; the
    /// orchestrator charges it when it consumes [`Event::TowerBuilt`].
    pub fn try_build(
        &mut self,
        kind: TowerTypeId,
        cell: CellCoord,
        gold: u32,
        grid: &mut Grid,
        catalogue: &TowerCatalogue,
        out: &mut Vec<Event>,
    ) -> Result<TowerId, PlacementError> {
        match self.build(kind, cell, gold, grid, catalogue) {
            Ok(tower) => {
                let cost = catalogue.get_kind(kind).map_or(0, |entry| entry.cost);
                info!(tower = tower.get(), %kind, %cell, cost, "tower built");
                out.push(Event::TowerBuilt {
                    tower,
                    kind,
                    cell,
                    cost,
                });
                Ok(tower)
            }
            Err(reason) => {
                debug!(%kind, %cell, %reason, "placement rejected");
                out.push(Event::PlacementRejected {
                    cell,
                    reason: reason.clone(),
                });
                Err(reason)
            }
        }
    }

    /// Places the selected tower type on the cell.
    pub fn build_selected(
        &mut self,
        cell: CellCoord,
        gold: u32,
        grid: &mut Grid,
        catalogue: &TowerCatalogue,
        out: &mut Vec<Event>,
    ) -> Result<TowerId, PlacementError> {
        match self.selected {
            Some(kind) => self.try_build(kind, cell, gold, grid, catalogue, out),
            None => {
                let reason = PlacementError::NothingSelected;
                debug!(%cell, %reason, "placement rejected");
                out.push(Event::PlacementRejected {
                    cell,
                    reason: reason.clone(),
                });
                Err(reason)
            }
        }
    }

    fn build(
        &mut self,
        kind: TowerTypeId,
        cell: CellCoord,
        gold: u32,
        grid: &mut Grid,
        catalogue: &TowerCatalogue,
    ) -> Result<TowerId, PlacementError> {
        if !grid.in_bounds(cell) {
            return Err(PlacementError::OutOfBounds { cell });
        }
        if !grid.can_build_at(cell) {
            return Err(PlacementError::Occupied { cell });
        }
        let entry = catalogue
            .get_kind(kind)
            .ok_or_else(|| PlacementError::UnknownTowerType(kind.key().to_owned()))?;
        if gold < entry.cost {
            return Err(PlacementError::InsufficientGold {
                cost: entry.cost,
                available: gold,
            });
        }

        let top_left = grid.cell_to_world(cell);
        let size = grid.tile_size();
        let tower = self
            .registry
            .insert_with(|id| Tower::from_type(id, cell, top_left, size, entry));
        if !grid.place_tower(cell, tower) {
            let _ = self.registry.remove(tower);
            return Err(PlacementError::Occupied { cell });
        }
        Ok(tower)
    }

    /// Demolishes the tower on the cell, running its components' removal hooks.
    pub fn remove_tower(
        &mut self,
        cell: CellCoord,
        grid: &mut Grid,
        out: &mut Vec<Event>,
    ) -> Option<Tower> {
        let id = grid.remove_tower(cell)?;
        let mut tower = self.registry.remove(id)?;
        tower.detach_all();
        info!(tower = id.get(), %cell, "tower removed");
        out.push(Event::TowerRemoved { tower: id, cell });
        Some(tower)
    }

    /// Describes what a click on the cell would do.
    #[must_use]
    pub fn preview(
        &self,
        cell: CellCoord,
        gold: u32,
        grid: &Grid,
        catalogue: &TowerCatalogue,
    ) -> Option<PlacementPreview> {
        if !grid.in_bounds(cell) {
            return None;
        }
        let kind = self.selected?;
        let entry = catalogue.get_kind(kind)?;
        Some(PlacementPreview {
            cell,
            kind,
            buildable: grid.can_build_at(cell),
            affordable: gold >= entry.cost,
            range: entry.shooting().map_or(0.0, |shooting| shooting.range),
        })
    }

    /// Runs every tower in identifier order.
    pub fn update(
        &mut self,
        dt: Duration,
        enemies: &mut [Enemy],
        commands: &mut Vec<Command>,
        events: &mut Vec<Event>,
    ) {
        let mut ctx = CombatContext {
            enemies,
            commands,
            events,
        };
        for tower in self.registry.iter_mut() {
            tower.update(dt, &mut ctx);
        }
    }

    /// Removes every tower and restores the default selection.
    pub fn reset(&mut self) {
        self.registry.clear();
        self.selected = Some(TowerTypeId::Cannon);
    }
}
