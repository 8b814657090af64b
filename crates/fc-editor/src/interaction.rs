//! Pointer gesture state machine.
//!
//! Translates input events plus what the pointer is over into [`Effect`]s
//! that the engine applies to its scene, selection and viewport. The machine
//! itself never touches the scene, so a cancelled gesture cannot leave it
//! half-edited.
//!
//! | Pointer-down on | Effect | Next state |
//! |-----------------|--------|------------|
//! | node | select (additive with ctrl/⌘) | `DraggingNode` |
//! | port | start provisional edge | `CreatingEdge` |
//! | edge | select (additive with ctrl/⌘) | `Idle` |
//! | background | clear selection, canvas click | `PanningCanvas` |

use crate::input::InputEvent;
use fc_core::{PortRef, Selected, Viewport};
use fc_render::{HitTarget, ProvisionalEdge};
use kurbo::{Point, Vec2};

#[derive(Debug, Clone, PartialEq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    /// `last` is the previous screen-space pointer sample.
    DraggingNode { node: String, last: Point },
    PanningCanvas { last: Point },
    CreatingEdge {
        edge: ProvisionalEdge,
        /// Candidate drop port on another node, if the pointer is over one.
        hovered: Option<PortRef>,
    },
}

/// Something the engine must do in response to input.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Select { item: Selected, additive: bool },
    ClearSelection,
    /// Pointer went down on empty canvas at this world point.
    CanvasClick { world: Point },
    /// Move a node by a world-space delta.
    MoveNode { id: String, delta: Vec2 },
    /// Translate the viewport by a screen-space delta.
    Pan { delta: Vec2 },
    /// Wheel zoom anchored at a screen point.
    Zoom { anchor: Point, zoom_in: bool },
    Connect { source: PortRef, target: PortRef },
    /// Only transient state changed; repaint without notifying.
    Redraw,
}

#[derive(Debug, Default)]
pub struct Gesture {
    state: GestureState,
}

impl Gesture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &GestureState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == GestureState::Idle
    }

    pub fn provisional(&self) -> Option<&ProvisionalEdge> {
        match &self.state {
            GestureState::CreatingEdge { edge, .. } => Some(edge),
            _ => None,
        }
    }

    pub fn hovered_port(&self) -> Option<&PortRef> {
        match &self.state {
            GestureState::CreatingEdge { hovered, .. } => hovered.as_ref(),
            _ => None,
        }
    }

    /// Abort the gesture in flight. Returns `true` if a provisional edge was
    /// discarded and the canvas needs repainting.
    pub fn cancel(&mut self) -> bool {
        let had_edge = matches!(self.state, GestureState::CreatingEdge { .. });
        if !self.is_idle() {
            log::debug!("gesture cancelled: {:?}", self.state);
        }
        self.state = GestureState::Idle;
        had_edge
    }

    /// Advance the machine. `hit` is what the pointer is over at the event's
    /// position; `viewport` is the view the event was sampled in.
    pub fn handle(&mut self, event: &InputEvent, hit: &HitTarget, viewport: &Viewport) -> Vec<Effect> {
        match event {
            InputEvent::PointerDown { x, y, modifiers } => {
                self.cancel();
                let screen = Point::new(*x, *y);
                let additive = modifiers.command();
                let effects = match hit {
                    HitTarget::Node(id) => {
                        self.state = GestureState::DraggingNode {
                            node: id.clone(),
                            last: screen,
                        };
                        vec![Effect::Select {
                            item: Selected::Node(id.clone()),
                            additive,
                        }]
                    }
                    HitTarget::Port(port) => {
                        let world = viewport.to_world(screen);
                        self.state = GestureState::CreatingEdge {
                            edge: ProvisionalEdge {
                                source: port.clone(),
                                start: world,
                                end: world,
                            },
                            hovered: None,
                        };
                        vec![Effect::Redraw]
                    }
                    HitTarget::Edge(id) => vec![Effect::Select {
                        item: Selected::Edge(id.clone()),
                        additive,
                    }],
                    HitTarget::Background => {
                        self.state = GestureState::PanningCanvas { last: screen };
                        vec![
                            Effect::ClearSelection,
                            Effect::CanvasClick {
                                world: viewport.to_world(screen),
                            },
                        ]
                    }
                };
                log::debug!("pointer down on {hit:?} -> {:?}", self.state);
                effects
            }

            InputEvent::PointerMove { x, y, .. } => {
                let screen = Point::new(*x, *y);
                match &mut self.state {
                    GestureState::Idle => vec![],
                    GestureState::DraggingNode { node, last } => {
                        let delta = (screen - *last) / viewport.scale;
                        *last = screen;
                        vec![Effect::MoveNode {
                            id: node.clone(),
                            delta,
                        }]
                    }
                    GestureState::PanningCanvas { last } => {
                        let delta = screen - *last;
                        *last = screen;
                        vec![Effect::Pan { delta }]
                    }
                    GestureState::CreatingEdge { edge, hovered } => {
                        edge.end = viewport.to_world(screen);
                        *hovered = match hit {
                            HitTarget::Port(port) if port.node != edge.source.node => Some(port.clone()),
                            _ => None,
                        };
                        vec![Effect::Redraw]
                    }
                }
            }

            InputEvent::PointerUp { .. } => {
                let finished = std::mem::take(&mut self.state);
                if finished != GestureState::Idle {
                    log::debug!("gesture finished: {finished:?}");
                }
                match finished {
                    GestureState::CreatingEdge { edge, .. } => match hit {
                        HitTarget::Port(target) if target.node != edge.source.node => {
                            vec![Effect::Connect {
                                source: edge.source,
                                target: target.clone(),
                            }]
                        }
                        _ => vec![Effect::Redraw],
                    },
                    _ => vec![],
                }
            }

            InputEvent::PointerLeave => {
                if self.cancel() {
                    vec![Effect::Redraw]
                } else {
                    vec![]
                }
            }

            InputEvent::Wheel { x, y, delta_y } => {
                if *delta_y == 0.0 {
                    return vec![];
                }
                vec![Effect::Zoom {
                    anchor: Point::new(*x, *y),
                    zoom_in: *delta_y < 0.0,
                }]
            }
        }
    }
}
