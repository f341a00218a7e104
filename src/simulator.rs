use std::fs::File;
use std::path::Path;

use indexmap::IndexMap;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::cli::OutputFormat;
use crate::component::{Component, ComponentKind};
use crate::error::Result;
use crate::schematic::Schematic;
use crate::value::parse_value;

/// Circuit-wide figures of the DC estimate
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub total_voltage: f64,
    pub total_resistance: f64,
    pub total_current: f64,
    pub num_components: usize,
    pub num_connections: usize,
}

/// Output of [`Schematic::simulate`].
///
/// `nodes` is keyed `V(<name>+)` / `V(<name>-)`; the other maps are keyed by
/// component name. Entries keep insertion order: sources first, then the
/// resistor chain in collection order, then the per-kind estimates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationResults {
    pub nodes: IndexMap<String, f64>,
    pub currents: IndexMap<String, f64>,
    pub power: IndexMap<String, f64>,
    pub voltages: IndexMap<String, f64>,
    pub summary: SimulationSummary,
}

impl Schematic {
    /// Approximate DC analysis.
    ///
    /// This is not a nodal solver. All resistors are treated as one series
    /// chain in collection order, fed by the sum of the DC sources, and the
    /// remaining parts get fixed per-kind estimates. Never fails; unreadable
    /// values count as 0.
    pub fn simulate(&self) -> SimulationResults {
        let mut results = SimulationResults::default();

        let sources: Vec<(&str, f64)> = self
            .components
            .iter()
            .filter(|c| matches!(c.kind, ComponentKind::VoltageSource | ComponentKind::Vcc))
            .map(|c| (c.name.as_str(), c.numeric_value()))
            .collect();
        for &(name, voltage) in &sources {
            results.voltages.insert(name.to_string(), voltage);
        }

        let mut total_voltage: f64 = sources.iter().map(|&(_, v)| v).sum();
        if total_voltage == 0.0 {
            total_voltage = self.config.default_supply_voltage;
        }

        let resistors: Vec<(&Component, f64)> = self
            .components
            .iter()
            .filter(|c| c.kind == ComponentKind::Resistor)
            .map(|c| (c, c.numeric_value()))
            .collect();
        let total_resistance: f64 = resistors.iter().map(|&(_, r)| r).filter(|&r| r > 0.0).sum();

        let total_current = if total_resistance > 0.0 {
            total_voltage / total_resistance
        } else {
            0.0
        };
        debug!(
            "DC estimate: V={} R={} I={}",
            total_voltage, total_resistance, total_current
        );

        for &(name, voltage) in &sources {
            results.nodes.insert(format!("V({}+)", name), voltage);
            results.nodes.insert(format!("V({}-)", name), 0.0);
        }

        let mut node_voltage = total_voltage;
        for &(resistor, resistance) in &resistors {
            let current = self.branch_current(resistor, total_current);
            let v_drop = current * resistance;
            let name = &resistor.name;

            results.currents.insert(name.clone(), current);
            results.power.insert(name.clone(), current * current * resistance);
            results.voltages.insert(name.clone(), v_drop);
            results.nodes.insert(format!("V({}+)", name), node_voltage);
            node_voltage -= v_drop;
            results.nodes.insert(format!("V({}-)", name), node_voltage);
        }

        for component in &self.components {
            let name = &component.name;
            match component.kind {
                ref kind if kind.is_diode_like() => {
                    let forward = kind.forward_voltage();
                    if total_current > 0.0 {
                        results.currents.insert(name.clone(), total_current);
                        results.power.insert(name.clone(), forward * total_current);
                        results.voltages.insert(name.clone(), forward);
                    }
                }
                ComponentKind::Capacitor => {
                    results.currents.insert(name.clone(), 0.0);
                    results.power.insert(name.clone(), 0.0);
                    results.voltages.insert(name.clone(), total_voltage);
                }
                ComponentKind::Inductor => {
                    results.currents.insert(name.clone(), total_current);
                    results.power.insert(name.clone(), 0.0);
                    results.voltages.insert(name.clone(), 0.0);
                }
                _ => {}
            }
        }

        results.summary = SimulationSummary {
            total_voltage,
            total_resistance,
            total_current,
            num_components: self.components.len(),
            num_connections: self.connections.len(),
        };
        info!(
            "Simulated {} component(s), {} connection(s)",
            results.summary.num_components, results.summary.num_connections
        );
        results
    }

    /// The first current source wired to `resistor` forces its current,
    /// unless that source reads as zero.
    fn branch_current(&self, resistor: &Component, total_current: f64) -> f64 {
        self.connected_components(resistor.id)
            .into_iter()
            .find(|c| c.kind == ComponentKind::CurrentSource)
            .map(|source| parse_value(&source.value))
            .filter(|&current| current != 0.0)
            .unwrap_or(total_current)
    }
}

impl SimulationResults {
    /// Export results to file
    pub fn export(&self, filename: impl AsRef<Path>, format: OutputFormat) -> Result<()> {
        match format {
            OutputFormat::Csv => self.write_csv(filename),
            OutputFormat::Json => self.write_json(filename),
        }
    }

    /// One `section,name,value` row per entry
    pub fn write_csv(&self, filename: impl AsRef<Path>) -> Result<()> {
        let filename = filename.as_ref();
        let mut writer = csv::Writer::from_path(filename)?;

        writer.write_record(["section", "name", "value"])?;
        let sections = [
            ("node", &self.nodes),
            ("current", &self.currents),
            ("power", &self.power),
            ("voltage", &self.voltages),
        ];
        for (section, entries) in sections {
            for (name, value) in entries {
                writer.write_record([section, name.as_str(), value.to_string().as_str()])?;
            }
        }

        let summary = &self.summary;
        for (name, value) in [
            ("total_voltage", summary.total_voltage.to_string()),
            ("total_resistance", summary.total_resistance.to_string()),
            ("total_current", summary.total_current.to_string()),
            ("num_components", summary.num_components.to_string()),
            ("num_connections", summary.num_connections.to_string()),
        ] {
            writer.write_record(["summary", name, value.as_str()])?;
        }

        writer.flush()?;
        info!("Results exported to CSV: {}", filename.display());
        Ok(())
    }

    pub fn write_json(&self, filename: impl AsRef<Path>) -> Result<()> {
        let filename = filename.as_ref();
        let file = File::create(filename)?;
        serde_json::to_writer_pretty(file, self)?;

        info!("Results exported to JSON: {}", filename.display());
        Ok(())
    }

    /// Print simulation summary
    pub fn print_summary(&self) {
        let summary = &self.summary;
        println!("\n=== DC Estimate ===");
        println!("Components: {}", summary.num_components);
        println!("Connections: {}", summary.num_connections);
        println!("Total voltage: {:.6}V", summary.total_voltage);
        println!("Total resistance: {:.3}Ω", summary.total_resistance);
        println!("Total current: {:.6}A", summary.total_current);

        if !self.nodes.is_empty() {
            println!("\nNode voltages:");
            for (node, voltage) in &self.nodes {
                println!("  {}: {:.6}V", node, voltage);
            }
        }

        if !self.currents.is_empty() {
            println!("\nBranch estimates:");
            for (name, current) in &self.currents {
                let power = self.power.get(name).copied().unwrap_or(0.0);
                let voltage = self.voltages.get(name).copied().unwrap_or(0.0);
                println!("  {}: I={:.6}A  V={:.6}V  P={:.6}W", name, current, voltage, power);
            }
        }
    }
}
