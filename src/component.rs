use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::Point;
use crate::value::parse_value;

/// Terminal layout used for kinds the type table does not know.
const FALLBACK_TERMINALS: &[(i32, i32)] = &[(-30, 0), (30, 0)];

/// Kinds of schematic components.
///
/// The set is closed; `Other` keeps the type string of anything dropped onto
/// the canvas that is not in the table, so it can be saved and reloaded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ComponentKind {
    Resistor,
    Capacitor,
    Inductor,
    Potentiometer,
    VoltageSource,
    VoltageAc,
    CurrentSource,
    Ground,
    Vcc,
    Diode,
    Zener,
    Led,
    Schottky,
    TransistorNpn,
    TransistorPnp,
    MosfetN,
    MosfetP,
    Opamp,
    Comparator,
    Relay,
    Timer555,
    Voltmeter,
    Ammeter,
    Oscilloscope,
    Probe,
    Switch,
    Fuse,
    Transformer,
    Crystal,
    Other(String),
}

impl ComponentKind {
    /// Every kind in the type table, in palette order
    pub const ALL: [ComponentKind; 29] = [
        ComponentKind::Resistor,
        ComponentKind::Capacitor,
        ComponentKind::Inductor,
        ComponentKind::Potentiometer,
        ComponentKind::VoltageSource,
        ComponentKind::VoltageAc,
        ComponentKind::CurrentSource,
        ComponentKind::Ground,
        ComponentKind::Vcc,
        ComponentKind::Diode,
        ComponentKind::Zener,
        ComponentKind::Led,
        ComponentKind::Schottky,
        ComponentKind::TransistorNpn,
        ComponentKind::TransistorPnp,
        ComponentKind::MosfetN,
        ComponentKind::MosfetP,
        ComponentKind::Opamp,
        ComponentKind::Comparator,
        ComponentKind::Relay,
        ComponentKind::Timer555,
        ComponentKind::Voltmeter,
        ComponentKind::Ammeter,
        ComponentKind::Oscilloscope,
        ComponentKind::Probe,
        ComponentKind::Switch,
        ComponentKind::Fuse,
        ComponentKind::Transformer,
        ComponentKind::Crystal,
    ];

    /// Type string as stored in project files
    pub fn as_str(&self) -> &str {
        match self {
            ComponentKind::Resistor => "resistor",
            ComponentKind::Capacitor => "capacitor",
            ComponentKind::Inductor => "indutor",
            ComponentKind::Potentiometer => "potentiometer",
            ComponentKind::VoltageSource => "voltage_source",
            ComponentKind::VoltageAc => "voltage_ac",
            ComponentKind::CurrentSource => "current_source",
            ComponentKind::Ground => "gnd",
            ComponentKind::Vcc => "vcc",
            ComponentKind::Diode => "diode",
            ComponentKind::Zener => "zener",
            ComponentKind::Led => "led",
            ComponentKind::Schottky => "schottky",
            ComponentKind::TransistorNpn => "transistor_npn",
            ComponentKind::TransistorPnp => "transistor_pnp",
            ComponentKind::MosfetN => "mosfet_n",
            ComponentKind::MosfetP => "mosfet_p",
            ComponentKind::Opamp => "opamp",
            ComponentKind::Comparator => "comparator",
            ComponentKind::Relay => "relay",
            ComponentKind::Timer555 => "timer555",
            ComponentKind::Voltmeter => "voltmeter",
            ComponentKind::Ammeter => "ammeter",
            ComponentKind::Oscilloscope => "oscilloscope",
            ComponentKind::Probe => "probe",
            ComponentKind::Switch => "switch",
            ComponentKind::Fuse => "fuse",
            ComponentKind::Transformer => "transformer",
            ComponentKind::Crystal => "crystal",
            ComponentKind::Other(name) => name,
        }
    }

    /// Reference designator prefix used for auto-naming
    pub fn prefix(&self) -> &'static str {
        match self {
            ComponentKind::Resistor => "R",
            ComponentKind::Capacitor => "C",
            ComponentKind::Inductor => "L",
            ComponentKind::Potentiometer => "RV",
            ComponentKind::VoltageSource | ComponentKind::VoltageAc => "V",
            ComponentKind::CurrentSource => "I",
            ComponentKind::Ground => "GND",
            ComponentKind::Vcc => "VCC",
            ComponentKind::Diode
            | ComponentKind::Zener
            | ComponentKind::Led
            | ComponentKind::Schottky => "D",
            ComponentKind::TransistorNpn | ComponentKind::TransistorPnp => "Q",
            ComponentKind::MosfetN | ComponentKind::MosfetP => "M",
            ComponentKind::Opamp | ComponentKind::Comparator | ComponentKind::Timer555 => "U",
            ComponentKind::Relay => "K",
            ComponentKind::Voltmeter => "VM",
            ComponentKind::Ammeter => "AM",
            ComponentKind::Oscilloscope => "OSC",
            ComponentKind::Probe => "P",
            ComponentKind::Switch => "SW",
            ComponentKind::Fuse => "F",
            ComponentKind::Transformer => "T",
            ComponentKind::Crystal => "Y",
            ComponentKind::Other(_) => "X",
        }
    }

    /// Default `(value, unit, category)` for a freshly placed component
    pub fn defaults(&self) -> (&'static str, &'static str, Category) {
        use Category::*;
        match self {
            ComponentKind::Resistor => ("1k", "Ω", Passive),
            ComponentKind::Capacitor => ("100n", "F", Passive),
            ComponentKind::Inductor => ("10m", "H", Passive),
            ComponentKind::Potentiometer => ("10k", "Ω", Passive),
            ComponentKind::VoltageSource => ("12", "V", Source),
            ComponentKind::VoltageAc => ("120", "Vac", Source),
            ComponentKind::CurrentSource => ("1m", "A", Source),
            ComponentKind::Ground => ("0", "V", Source),
            ComponentKind::Vcc => ("5", "V", Source),
            ComponentKind::Diode => ("1N4148", "", Semiconductor),
            ComponentKind::Zener => ("5.1", "V", Semiconductor),
            ComponentKind::Led => ("RED", "", Semiconductor),
            ComponentKind::Schottky => ("1N5819", "", Semiconductor),
            ComponentKind::TransistorNpn => ("2N2222", "", Transistor),
            ComponentKind::TransistorPnp => ("2N2907", "", Transistor),
            ComponentKind::MosfetN => ("IRF540", "", Transistor),
            ComponentKind::MosfetP => ("IRF9540", "", Transistor),
            ComponentKind::Opamp => ("LM741", "", IntegratedCircuit),
            ComponentKind::Comparator => ("LM393", "", IntegratedCircuit),
            ComponentKind::Relay => ("12V", "", IntegratedCircuit),
            ComponentKind::Timer555 => ("NE555", "", IntegratedCircuit),
            ComponentKind::Voltmeter => ("", "V", Instrument),
            ComponentKind::Ammeter => ("", "A", Instrument),
            ComponentKind::Oscilloscope => ("", "", Instrument),
            ComponentKind::Probe => ("", "", Instrument),
            ComponentKind::Switch => ("SPST", "", Other),
            ComponentKind::Fuse => ("1", "A", Other),
            ComponentKind::Transformer => ("1:1", "", Other),
            ComponentKind::Crystal => ("16M", "Hz", Other),
            ComponentKind::Other(_) => ("", "", Other),
        }
    }

    /// Terminal offsets from the component centre, before rotation
    pub fn terminals(&self) -> &'static [(i32, i32)] {
        match self {
            ComponentKind::Resistor | ComponentKind::Inductor => &[(-40, 0), (40, 0)],
            ComponentKind::Capacitor => &[(-30, 0), (30, 0)],
            ComponentKind::Potentiometer => &[(-40, 0), (40, 0), (0, -30)],
            ComponentKind::VoltageSource
            | ComponentKind::VoltageAc
            | ComponentKind::CurrentSource => &[(0, -30), (0, 30)],
            ComponentKind::Ground => &[(0, -20)],
            ComponentKind::Vcc => &[(0, 20)],
            ComponentKind::Diode
            | ComponentKind::Zener
            | ComponentKind::Led
            | ComponentKind::Schottky => &[(-30, 0), (30, 0)],
            ComponentKind::TransistorNpn
            | ComponentKind::TransistorPnp
            | ComponentKind::MosfetN
            | ComponentKind::MosfetP => &[(-30, 0), (30, -20), (30, 20)],
            ComponentKind::Opamp | ComponentKind::Comparator => &[(-40, -15), (-40, 15), (40, 0)],
            ComponentKind::Relay | ComponentKind::Transformer => {
                &[(-40, -20), (-40, 20), (40, -20), (40, 20)]
            }
            ComponentKind::Timer555 => &[(-40, -30), (-40, 0), (-40, 30), (40, -30), (40, 0), (40, 30)],
            ComponentKind::Voltmeter | ComponentKind::Ammeter => &[(-20, 0), (20, 0)],
            ComponentKind::Oscilloscope => &[(0, 30)],
            ComponentKind::Probe => &[(0, 20)],
            ComponentKind::Switch | ComponentKind::Fuse => &[(-30, 0), (30, 0)],
            ComponentKind::Crystal => &[(-25, 0), (25, 0)],
            ComponentKind::Other(_) => FALLBACK_TERMINALS,
        }
    }

    /// Returns true for the diode family visited by the DC analysis
    pub fn is_diode_like(&self) -> bool {
        matches!(self, ComponentKind::Diode | ComponentKind::Led | ComponentKind::Schottky)
    }

    /// Forward voltage assumed by the DC analysis
    pub fn forward_voltage(&self) -> f64 {
        match self {
            ComponentKind::Led => 2.0,
            ComponentKind::Schottky => 0.3,
            _ => 0.7,
        }
    }
}

impl FromStr for ComponentKind {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s {
            "inductor" => ComponentKind::Inductor,
            _ => ComponentKind::ALL
                .iter()
                .find(|kind| kind.as_str() == s)
                .cloned()
                .unwrap_or_else(|| ComponentKind::Other(s.to_string())),
        };
        Ok(kind)
    }
}

impl From<String> for ComponentKind {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(kind) => kind,
            Err(never) => match never {},
        }
    }
}

impl From<ComponentKind> for String {
    fn from(kind: ComponentKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Palette grouping, fixed at creation time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Passivos")]
    Passive,
    #[serde(rename = "Fontes")]
    Source,
    #[serde(rename = "Semicondutores")]
    Semiconductor,
    #[serde(rename = "Transistores")]
    Transistor,
    #[serde(rename = "Integrados")]
    IntegratedCircuit,
    #[serde(rename = "Instrumentos")]
    Instrument,
    #[default]
    #[serde(rename = "Outros")]
    Other,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Category::Passive => "Passivos",
            Category::Source => "Fontes",
            Category::Semiconductor => "Semicondutores",
            Category::Transistor => "Transistores",
            Category::IntegratedCircuit => "Integrados",
            Category::Instrument => "Instrumentos",
            Category::Other => "Outros",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn default_visible() -> bool {
    true
}

/// A placed schematic component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: ComponentKind,
    pub name: String,
    pub x: i32,
    pub y: i32,
    #[serde(default)]
    pub rotation: u16,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default)]
    pub terminals: Vec<(i32, i32)>,
}

impl Component {
    /// Build a component from the type table. Only the store calls this.
    pub(crate) fn new(kind: ComponentKind, name: String, x: i32, y: i32) -> Self {
        let (value, unit, category) = kind.defaults();
        let terminals = kind.terminals().to_vec();
        Component {
            id: Uuid::new_v4(),
            kind,
            name,
            x,
            y,
            rotation: 0,
            value: value.to_string(),
            unit: unit.to_string(),
            category,
            visible: true,
            terminals,
        }
    }

    /// Centre position in canvas space
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn terminal_count(&self) -> usize {
        self.terminals.len()
    }

    /// Magnitude of `value`, 0.0 when it does not parse
    pub fn numeric_value(&self) -> f64 {
        parse_value(&self.value)
    }

    /// Repair a record read from disk: fill in a missing terminal layout and
    /// bring the rotation back into `0..360`.
    pub(crate) fn normalize(&mut self) {
        if self.terminals.is_empty() {
            self.terminals = self.kind.terminals().to_vec();
        }
        self.rotation %= 360;
    }
}

/// A wire between two component terminals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub id: Uuid,
    pub from_component: Uuid,
    #[serde(default)]
    pub from_terminal: usize,
    pub to_component: Uuid,
    #[serde(default)]
    pub to_terminal: usize,
}

impl Connection {
    pub(crate) fn new(from_component: Uuid, from_terminal: usize, to_component: Uuid, to_terminal: usize) -> Self {
        Connection {
            id: Uuid::new_v4(),
            from_component,
            from_terminal,
            to_component,
            to_terminal,
        }
    }

    /// Returns true if either end is on `component`
    pub fn touches(&self, component: Uuid) -> bool {
        self.from_component == component || self.to_component == component
    }

    /// The far end of the wire as seen from `component`
    pub fn other_end(&self, component: Uuid) -> Option<Uuid> {
        if self.from_component == component {
            Some(self.to_component)
        } else if self.to_component == component {
            Some(self.from_component)
        } else {
            None
        }
    }
}
