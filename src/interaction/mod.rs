//! Pointer-driven interaction state machine.
//!
//! Transitions are pure: [`InteractionState::on_pointer`] takes a pointer
//! event already resolved against the plot area and returns the next state
//! plus the overlay commands to apply. The session owns the side effects.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::SnappedPoint;

/// Raw pointer event in surface pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Move { x: f64, y: f64 },
    Down { x: f64, y: f64 },
    Up { x: f64, y: f64 },
    Leave,
}

impl PointerEvent {
    #[must_use]
    pub fn position(self) -> Option<(f64, f64)> {
        match self {
            Self::Move { x, y } | Self::Down { x, y } | Self::Up { x, y } => Some((x, y)),
            Self::Leave => None,
        }
    }
}

/// Pointer event plus the primary-series point under it.
///
/// `hit` is `Some` only when the pointer is inside the plot area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedPointer {
    pub event: PointerEvent,
    pub hit: Option<SnappedPoint>,
}

impl ResolvedPointer {
    #[must_use]
    pub fn outside(event: PointerEvent) -> Self {
        Self { event, hit: None }
    }

    #[must_use]
    pub fn inside(event: PointerEvent, hit: SnappedPoint) -> Self {
        Self {
            event,
            hit: Some(hit),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum InteractionState {
    #[default]
    Idle,
    Hovering(SnappedPoint),
    Clicked {
        anchor: SnappedPoint,
    },
    Dragging {
        anchor: SnappedPoint,
        current: SnappedPoint,
    },
}

/// Where the hover value label is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HoverLabelPlacement {
    /// Pinned to the top edge of the plot, above the point's x.
    Top,
    /// At the point itself; used for the click anchor.
    AtValue,
}

/// Mutation of the overlay primitives produced by a transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OverlayCommand {
    ShowCrosshair { x: f64 },
    HideCrosshair,
    ShowMarker(SnappedPoint),
    HideMarker,
    ShowHoverLabel {
        point: SnappedPoint,
        placement: HoverLabelPlacement,
    },
    HideHoverLabel,
    DimSeries,
    RestoreSeries,
    ShowMeasurement {
        anchor: SnappedPoint,
        current: SnappedPoint,
    },
    ClearMeasurement,
}

pub type OverlayCommands = SmallVec<[OverlayCommand; 6]>;

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub next: InteractionState,
    pub commands: OverlayCommands,
}

impl Transition {
    fn stay(state: InteractionState) -> Self {
        Self {
            next: state,
            commands: OverlayCommands::new(),
        }
    }
}

impl InteractionState {
    #[must_use]
    pub fn is_dragging(self) -> bool {
        matches!(self, Self::Dragging { .. })
    }

    /// Anchor of an active click or drag.
    #[must_use]
    pub fn anchor(self) -> Option<SnappedPoint> {
        match self {
            Self::Clicked { anchor } | Self::Dragging { anchor, .. } => Some(anchor),
            Self::Idle | Self::Hovering(_) => None,
        }
    }

    #[must_use]
    pub fn on_pointer(self, pointer: ResolvedPointer) -> Transition {
        match (pointer.event, pointer.hit) {
            (PointerEvent::Move { x, .. }, Some(point)) => self.on_move_inside(x, point),
            (PointerEvent::Move { .. } | PointerEvent::Leave, _) => self.on_leave(),
            (PointerEvent::Down { .. }, Some(anchor)) => Self::on_down(anchor),
            (PointerEvent::Down { .. }, None) => Transition::stay(self),
            (PointerEvent::Up { x, .. }, hit) => Self::on_up(x, hit),
        }
    }

    fn on_move_inside(self, x: f64, point: SnappedPoint) -> Transition {
        let mut commands = OverlayCommands::new();
        commands.push(OverlayCommand::ShowCrosshair { x });
        commands.push(OverlayCommand::ShowMarker(point));

        let next = match self.anchor() {
            Some(anchor) => {
                commands.push(OverlayCommand::HideHoverLabel);
                commands.push(OverlayCommand::ShowMeasurement {
                    anchor,
                    current: point,
                });
                Self::Dragging {
                    anchor,
                    current: point,
                }
            }
            None => {
                commands.push(OverlayCommand::ShowHoverLabel {
                    point,
                    placement: HoverLabelPlacement::Top,
                });
                Self::Hovering(point)
            }
        };

        Transition { next, commands }
    }

    fn on_leave(self) -> Transition {
        let mut commands = OverlayCommands::new();
        commands.push(OverlayCommand::HideCrosshair);
        commands.push(OverlayCommand::HideMarker);
        commands.push(OverlayCommand::HideHoverLabel);

        if self.is_dragging() {
            return Transition {
                next: self,
                commands,
            };
        }

        commands.push(OverlayCommand::ClearMeasurement);
        commands.push(OverlayCommand::RestoreSeries);
        Transition {
            next: Self::Idle,
            commands,
        }
    }

    fn on_down(anchor: SnappedPoint) -> Transition {
        let mut commands = OverlayCommands::new();
        commands.push(OverlayCommand::ClearMeasurement);
        commands.push(OverlayCommand::DimSeries);
        commands.push(OverlayCommand::ShowMarker(anchor));
        commands.push(OverlayCommand::ShowHoverLabel {
            point: anchor,
            placement: HoverLabelPlacement::AtValue,
        });
        Transition {
            next: Self::Clicked { anchor },
            commands,
        }
    }

    fn on_up(x: f64, hit: Option<SnappedPoint>) -> Transition {
        let mut commands = OverlayCommands::new();
        commands.push(OverlayCommand::ClearMeasurement);
        commands.push(OverlayCommand::RestoreSeries);

        let next = match hit {
            Some(point) => {
                commands.push(OverlayCommand::ShowCrosshair { x });
                commands.push(OverlayCommand::ShowMarker(point));
                commands.push(OverlayCommand::ShowHoverLabel {
                    point,
                    placement: HoverLabelPlacement::Top,
                });
                Self::Hovering(point)
            }
            None => {
                commands.push(OverlayCommand::HideCrosshair);
                commands.push(OverlayCommand::HideMarker);
                commands.push(OverlayCommand::HideHoverLabel);
                Self::Idle
            }
        };

        Transition { next, commands }
    }
}
