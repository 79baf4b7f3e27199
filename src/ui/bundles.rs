use bevy::color::Color;
use bevy::prelude::*;

#[derive(Bundle)]
pub struct LabelBundle {
    pub text: Text,
    pub font: TextFont,
    pub color: TextColor,
    pub node: Node,
}

impl LabelBundle {
    pub fn new(text: &str, font_size: f32, color: Color) -> Self {
        Self {
            text: Text::new(text),
            font: TextFont {
                font_size,
                ..default()
            },
            color: TextColor(color),
            node: Node::default(),
        }
    }

    pub fn with_margin(mut self, margin: UiRect) -> Self {
        self.node.margin = margin;
        self
    }
}

/// Full-window layer that centers its children and hides the scene behind it.
#[derive(Bundle)]
pub struct OverlayBundle {
    pub node: Node,
    pub background: BackgroundColor,
    pub z_index: GlobalZIndex,
}

impl OverlayBundle {
    pub fn new(background: Color) -> Self {
        Self {
            node: Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                position_type: PositionType::Absolute,
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            background: BackgroundColor(background),
            z_index: GlobalZIndex(10),
        }
    }
}

#[derive(Bundle)]
pub struct ProgressTrackBundle {
    pub node: Node,
    pub background: BackgroundColor,
    pub border_radius: BorderRadius,
}

impl ProgressTrackBundle {
    pub fn new(width: f32, height: f32, color: Color) -> Self {
        Self {
            node: Node {
                width: Val::Px(width),
                height: Val::Px(height),
                position_type: PositionType::Relative,
                overflow: Overflow::clip(),
                ..default()
            },
            background: BackgroundColor(color),
            border_radius: BorderRadius::all(Val::Px(height / 2.0)),
        }
    }
}

#[derive(Bundle)]
pub struct ProgressFillBundle {
    pub node: Node,
    pub background: BackgroundColor,
    pub border_radius: BorderRadius,
}

impl ProgressFillBundle {
    pub fn new(height: f32, color: Color) -> Self {
        Self {
            node: Node {
                width: Val::Percent(0.0),
                height: Val::Px(height),
                position_type: PositionType::Absolute,
                left: Val::Px(0.0),
                ..default()
            },
            background: BackgroundColor(color),
            border_radius: BorderRadius::all(Val::Px(height / 2.0)),
        }
    }
}
