//! Spatial classification of the objects around the viewer.

use std::collections::HashSet;

use nalgebra::distance;

use crate::highlight::annotation::ObjectId;
use crate::highlight::category::Category;
use crate::highlight::color::{Color, RarityTier};
use crate::highlight::settings::Settings;
use crate::integration::{Position, World};

/// Container name keywords, checked in order against the lowercased name.
const CONTAINER_SUBTYPES: &[(&[&str], &str)] = &[
    (&["med"], "Medical"),
    (&["tech"], "Tech"),
    (&["ammo"], "Ammo"),
    (&["weapon"], "Weapon"),
    (&["tool"], "Toolbox"),
    (&["duffle"], "Duffle Bag"),
    (&["jacket"], "Jacket"),
    (&["cash"], "Cash"),
    (&["safe"], "Safe"),
    (&["drawer"], "Drawer"),
    (&["pc", "computer"], "Computer"),
];

/// Root ancestor name fragments marking an inventory or UI subtree.
const UI_CONTEXT_MARKERS: &[&str] = &["Inventory", "UI"];

/// An object found by a scan that should carry a highlight.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate<T> {
    pub id: ObjectId,
    pub category: Category,
    pub label: String,
    pub color: Color,
    pub position: Position,
    /// World handle the annotation gets attached to
    pub target: T,
}

/// Human readable container sub-type derived from the container's name.
pub fn container_subtype(name: &str) -> &'static str {
    let name = name.to_lowercase();
    CONTAINER_SUBTYPES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| name.contains(k)))
        .map(|(_, subtype)| *subtype)
        .unwrap_or("Unknown")
}

/// Whether a root ancestor name belongs to an inventory or UI subtree.
pub fn is_ui_context(root_name: &str) -> bool {
    UI_CONTEXT_MARKERS.iter().any(|m| root_name.contains(m))
}

/// Query the world around `center` and classify every hit.
///
/// Inactive objects, objects under an inventory/UI root and objects of a
/// disabled category are dropped. Each identity appears at most once, in the
/// order the world returned it. Only a failing overlap query is an error.
pub fn classify<W: World>(
    world: &W,
    center: &Position,
    radius: f32,
    settings: &Settings,
) -> Result<Vec<Candidate<W::Handle>>, W::Error> {
    let hits = world.overlap_sphere(center, radius)?;

    let mut seen = HashSet::new();
    let mut candidates = Vec::new();

    for handle in hits {
        let Some(id) = world.stable_id(&handle) else {
            continue;
        };
        if !seen.insert(id) {
            continue;
        }
        if !world.is_active_in_scene(&handle) || is_ui_context(&world.root_ancestor_name(&handle))
        {
            continue;
        }
        let Some(position) = world.position(&handle) else {
            continue;
        };

        let Some((category, mut label, color)) = classify_one(world, &handle, settings) else {
            continue;
        };
        if !settings.is_category_enabled(category) {
            continue;
        }

        if settings.show_distance() {
            label.push_str(&format!(" ({:.1}m)", distance(center, &position)));
        }

        candidates.push(Candidate {
            id,
            category,
            label,
            color,
            position,
            target: handle,
        });
    }

    Ok(candidates)
}

/// Item, then corpse, then container. First capability found decides.
fn classify_one<W: World>(
    world: &W,
    handle: &W::Handle,
    settings: &Settings,
) -> Option<(Category, String, Color)> {
    if let Some(item) = world.lootable_item(handle) {
        let tier = RarityTier::from_template_id(item.template_id.as_deref().unwrap_or(""));
        let label = item.localized_name.unwrap_or_else(|| "Item".to_string());
        return Some((Category::Item, label, tier.color()));
    }

    if world.corpse(handle).is_some() {
        return Some((
            Category::Corpse,
            "Corpse".to_string(),
            settings.category_color(Category::Corpse),
        ));
    }

    if let Some(container) = world.lootable_container(handle) {
        let label = format!("Container ({})", container_subtype(&container.name));
        return Some((
            Category::Container,
            label,
            settings.category_color(Category::Container),
        ));
    }

    None
}
