use crate::component::ComponentKind;
use crate::schematic::Schematic;

/// First line of every generated netlist
pub const NETLIST_HEADER: &str = "* schemsim - SPICE Netlist";

impl Schematic {
    /// Emit a SPICE-like netlist.
    ///
    /// Node numbers are handed out sequentially per emitted line rather than
    /// derived from wiring: passives take two fresh nodes, DC sources one fresh
    /// node against ground. Other kinds produce no line.
    pub fn build_netlist(&self) -> String {
        let mut lines = vec![NETLIST_HEADER.to_string(), String::new()];
        let mut node = 1;

        for component in &self.components {
            match component.kind {
                ComponentKind::Ground => continue,
                ComponentKind::Resistor | ComponentKind::Capacitor | ComponentKind::Inductor => {
                    lines.push(format!("{} n{} n{} {}", component.name, node, node + 1, component.value));
                    node += 2;
                }
                ComponentKind::VoltageSource => {
                    lines.push(format!("{} n{} 0 DC {}", component.name, node, component.value));
                    node += 1;
                }
                _ => {}
            }
        }

        lines.push("\n.END".to_string());
        lines.join("\n")
    }
}
