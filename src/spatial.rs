//! Hit-testing of canvas positions against the entity store.
//!
//! Both queries are linear scans that respect visibility. Terminals resolve
//! by first match in insertion order; component bodies resolve topmost
//! (most recently added) first.

use log::debug;
use uuid::Uuid;

use crate::component::{Component, Connection};
use crate::error::Result;
use crate::geometry::{terminal_positions, Point, TerminalPoint};
use crate::schematic::Schematic;

/// A terminal under the cursor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerminalHit {
    pub component: Uuid,
    pub terminal: usize,
    pub position: TerminalPoint,
}

impl Schematic {
    /// First terminal of a visible component closer than the hit radius to
    /// `p`, skipping `exclude`.
    pub fn find_terminal_at(&self, p: Point, exclude: Option<Uuid>) -> Option<TerminalHit> {
        let radius = self.config.terminal_hit_radius;

        self.components
            .iter()
            .filter(|c| c.visible && Some(c.id) != exclude)
            .find_map(|component| {
                terminal_positions(component)
                    .into_iter()
                    .enumerate()
                    .find(|(_, position)| p.distance_to(position) < radius)
                    .map(|(terminal, position)| TerminalHit {
                        component: component.id,
                        terminal,
                        position,
                    })
            })
    }

    /// Topmost visible component whose body box contains `p`. The box ignores
    /// rotation.
    pub fn find_component_at(&self, p: Point) -> Option<&Component> {
        let half_w = self.config.body_half_width;
        let half_h = self.config.body_half_height;

        self.components
            .iter()
            .rev()
            .filter(|c| c.visible)
            .find(|c| (p.x - c.x).abs() < half_w && (p.y - c.y).abs() < half_h)
    }

    /// Feed a wiring click through `tool`, adding a connection when the
    /// second click lands on a terminal of another component.
    pub fn wire_click(&mut self, tool: &mut WireTool, p: Point) -> Option<Result<&Connection>> {
        let hit = self.find_terminal_at(p, None);
        let (from, to) = tool.click(hit)?;
        Some(self.add_connection(from.component, from.terminal, to.component, to.terminal))
    }
}

/// Two-click wiring state machine.
///
/// The first click on a terminal arms the tool. A second click on a terminal
/// of a different component yields both ends; clicking empty canvas or the
/// starting component disarms it.
#[derive(Debug, Clone, Default)]
pub struct WireTool {
    start: Option<TerminalHit>,
}

impl WireTool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Terminal the pending wire starts from
    pub fn start(&self) -> Option<&TerminalHit> {
        self.start.as_ref()
    }

    pub fn is_armed(&self) -> bool {
        self.start.is_some()
    }

    pub fn cancel(&mut self) {
        self.start = None;
    }

    /// Advance with the terminal under the cursor, if any
    pub fn click(&mut self, hit: Option<TerminalHit>) -> Option<(TerminalHit, TerminalHit)> {
        let Some(hit) = hit else {
            self.start = None;
            return None;
        };

        match self.start.take() {
            None => {
                debug!("Wire started at {}:{}", hit.component, hit.terminal);
                self.start = Some(hit);
                None
            }
            Some(start) if start.component != hit.component => Some((start, hit)),
            Some(_) => None,
        }
    }
}
