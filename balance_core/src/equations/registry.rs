//! # Equation Registry
//!
//! Metadata for every formula used by the synthesis engine, so reports can
//! print a "List of Equations" appendix next to the numbers.
//!
//! ## Usage
//!
//! ```rust
//! use balance_core::equations::registry::{Equation, synthesis_equations};
//!
//! let meta = Equation::ResultantMagnitude.metadata();
//! assert!(meta.formula_plain.contains("hypot"));
//! assert_eq!(synthesis_equations().len(), 4);
//! ```

use serde::{Deserialize, Serialize};

/// Definition of a variable used in an equation.
#[derive(Debug, Clone)]
pub struct Variable {
    /// Symbol (e.g., "m", "φ")
    pub symbol: &'static str,
    /// Description
    pub description: &'static str,
    /// Units (e.g., "deg", "g·mm")
    pub units: &'static str,
}

impl Variable {
    pub const fn new(symbol: &'static str, description: &'static str, units: &'static str) -> Self {
        Self { symbol, description, units }
    }
}

/// Complete metadata for one formula.
#[derive(Debug, Clone)]
pub struct EquationMetadata {
    /// Human-readable name
    pub name: &'static str,
    /// Brief description of what this equation calculates
    pub description: &'static str,
    /// The formula in Typst math notation for PDF rendering
    pub formula_typst: &'static str,
    /// The formula in plain text for HTML and terminal output
    pub formula_plain: &'static str,
    /// Variable definitions
    pub variables: Vec<Variable>,
    /// Function name implementing the equation
    pub source_function: &'static str,
}

/// All formulas used to build the resultant unbalance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Equation {
    /// x_i = m_i cos φ_i, y_i = m_i sin φ_i
    PhasorComponents,
    /// S_x = Σ x_i, S_y = Σ y_i
    ComponentSum,
    /// M = hypot(S_x, S_y)
    ResultantMagnitude,
    /// θ = (atan2(S_y, S_x) + 360) mod 360
    ResultantAngle,
}

impl Equation {
    /// Get the full metadata for this equation
    pub fn metadata(&self) -> EquationMetadata {
        match self {
            Equation::PhasorComponents => EquationMetadata {
                name: "Blade Phasor Components",
                description: "Cartesian components of one blade's static moment",
                formula_typst: r#"$x_i = m_i cos phi_i$, $y_i = m_i sin phi_i$"#,
                formula_plain: "x_i = m_i·cos(φ_i), y_i = m_i·sin(φ_i)",
                variables: vec![
                    Variable::new("m_i", "Blade moment magnitude", "input unit"),
                    Variable::new("phi_i", "Blade phase angle", "deg"),
                ],
                source_function: "polar_to_cartesian",
            },
            Equation::ComponentSum => EquationMetadata {
                name: "Component Sum",
                description: "Vector sum of all blade phasors",
                formula_typst: r#"$S_x = sum_i x_i$, $S_y = sum_i y_i$"#,
                formula_plain: "S_x = Σ x_i, S_y = Σ y_i",
                variables: vec![
                    Variable::new("S_x", "Sum of x components", "input unit"),
                    Variable::new("S_y", "Sum of y components", "input unit"),
                ],
                source_function: "synthesize",
            },
            Equation::ResultantMagnitude => EquationMetadata {
                name: "Resultant Magnitude",
                description: "Length of the summed phasor",
                formula_typst: r#"$M = sqrt(S_x^2 + S_y^2)$"#,
                formula_plain: "M = hypot(S_x, S_y)",
                variables: vec![Variable::new("M", "Resultant unbalance", "input unit")],
                source_function: "cartesian_to_polar",
            },
            Equation::ResultantAngle => EquationMetadata {
                name: "Resultant Angle",
                description: "Direction of the summed phasor, normalized to [0, 360)",
                formula_typst: r#"$theta = (op("atan2")(S_y, S_x) + 360°) op("mod") 360°$"#,
                formula_plain: "θ = (atan2(S_y, S_x) + 360) mod 360",
                variables: vec![Variable::new("theta", "Resultant angle", "deg")],
                source_function: "cartesian_to_polar",
            },
        }
    }
}

/// The formulas applied, in order, by every synthesis.
pub fn synthesis_equations() -> Vec<Equation> {
    vec![
        Equation::PhasorComponents,
        Equation::ComponentSum,
        Equation::ResultantMagnitude,
        Equation::ResultantAngle,
    ]
}

/// Generate Typst markup for the "List of Equations" appendix.
pub fn generate_appendix_typst(equations: &[Equation]) -> String {
    let mut output = String::new();

    output.push_str(
        r##"
#v(16pt)
#line(length: 100%, stroke: 0.5pt)
#v(8pt)

== Appendix: List of Equations

"##,
    );

    for equation in equations {
        let meta = equation.metadata();
        output.push_str(&format!("=== {}\n\n", meta.name));
        output.push_str(&format!("#text(size: 10pt)[{}]\n\n", meta.description));
        output.push_str(&format!("*Formula:* {}\n\n", meta.formula_typst));

        if !meta.variables.is_empty() {
            output.push_str("#table(\n");
            output.push_str("  columns: (auto, 1fr, auto),\n");
            output.push_str("  inset: 6pt,\n");
            output.push_str("  stroke: 0.5pt,\n");
            output.push_str("  table.header([*Symbol*], [*Description*], [*Units*]),\n");
            for var in &meta.variables {
                output.push_str(&format!(
                    "  [${}$], [{}], [{}],\n",
                    var.symbol, var.description, var.units
                ));
            }
            output.push_str(")\n\n");
        }
    }

    output
}
