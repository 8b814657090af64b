//! Built-in demo workflow shown when a host mounts the canvas without data.

use crate::model::{Edge, Node, Port, PortSide, Scene};
use crate::viewport::Viewport;

impl Scene {
    /// Input → Process → Output, wired through labelled ports.
    pub fn sample_workflow() -> Self {
        let input = Node::new("node-1", "input", 100.0, 100.0, 150.0, 80.0)
            .with_label("Input")
            .with_output(Port::new("out-1", "default").on(PortSide::Right).with_label("Output"));
        let process = Node::new("node-2", "process", 350.0, 100.0, 150.0, 80.0)
            .with_label("Process")
            .with_input(Port::new("in-1", "default").on(PortSide::Left).with_label("Input"))
            .with_output(Port::new("out-1", "default").on(PortSide::Right).with_label("Output"));
        let output = Node::new("node-3", "output", 600.0, 100.0, 150.0, 80.0)
            .with_label("Output")
            .with_input(Port::new("in-1", "default").on(PortSide::Left).with_label("Input"));

        Scene {
            nodes: vec![input, process, output],
            edges: vec![
                Edge::new("edge-1", "node-1", "node-2")
                    .with_ports("out-1", "in-1")
                    .with_label("Data"),
                Edge::new("edge-2", "node-2", "node-3")
                    .with_ports("out-1", "in-1")
                    .with_label("Result"),
            ],
            viewport: Viewport::default(),
        }
    }
}
