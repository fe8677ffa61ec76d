//! Cast controller: turns one item-use event into a switch, a hint or a cast.
//!
//! Nothing is remembered between events. Every decision is made from the live
//! player state the host reports at the moment of the call:
//!
//! 1. stale player or non-staff item: ignored, no feedback
//! 2. sneaking with no scroll in the off-hand: staff advances one element
//! 3. standing with no scroll: guidance hint
//! 4. scroll of another element: staff silently realigned to the scroll
//! 5. cast a random ability from the subset picked by the sneak flag

use crate::feedback::{ActionBar, FeedbackStyle};
use crate::table::{ability_subset, subset_start, AbilityCategory, SUBSET_SIZE};
use rand::Rng;
use serde::Serialize;
use tracing::{debug, trace};
use wizardiuz_core::{element_of_staff, Element, EntityId, GameHost, ItemStack, ItemUseEvent};

/// What a single item-use event did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum UseOutcome {
    /// Not a staff, or the player handle was stale.
    Ignored,
    /// Sneak-use without a scroll moved the staff to the next element.
    Switched {
        /// Element before the switch.
        from: Element,
        /// Element after the switch.
        to: Element,
    },
    /// No scroll in the off-hand; only a hint was shown.
    NeedsScroll {
        /// Element of the held staff.
        element: Element,
    },
    /// An ability ran.
    Cast(CastReport),
}

/// Details of a completed cast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CastReport {
    /// Element the ability belongs to (the scroll's element).
    pub element: Element,
    /// Table index of the ability (0..6).
    pub index: usize,
    /// Ability name.
    pub ability: &'static str,
    /// Ability category.
    pub category: AbilityCategory,
    /// Whether the caster was sneaking.
    pub sneaking: bool,
    /// Staff element before realignment, if the staff was swapped.
    pub realigned_from: Option<Element>,
}

/// Reacts to staff use.
#[derive(Debug, Clone, Copy, Default)]
pub struct CastController {
    style: FeedbackStyle,
}

impl CastController {
    /// Controller rendering feedback in `style`.
    pub fn new(style: FeedbackStyle) -> Self {
        Self { style }
    }

    /// Handle one item-use event.
    pub fn on_item_use<R: Rng>(
        &self,
        host: &mut dyn GameHost,
        rng: &mut R,
        event: &ItemUseEvent,
    ) -> UseOutcome {
        let player = event.source;
        let Some(state) = host.player(player) else {
            trace!(%player, "item use from stale player ignored");
            return UseOutcome::Ignored;
        };
        let Some(held) = event
            .item
            .as_ref()
            .and_then(|item| element_of_staff(&item.type_id))
        else {
            return UseOutcome::Ignored;
        };

        let scroll = host
            .offhand_item(player)
            .and_then(|item| item.scroll_element());

        let Some(scroll) = scroll else {
            if state.sneaking {
                let next = held.next();
                replace_staff(host, player, next);
                host.set_action_bar(player, &ActionBar::Switched(next).render(self.style));
                debug!(%player, from = %held, to = %next, "staff element switched");
                return UseOutcome::Switched {
                    from: held,
                    to: next,
                };
            }
            host.set_action_bar(player, &ActionBar::ScrollHint.render(self.style));
            return UseOutcome::NeedsScroll { element: held };
        };

        let realigned_from = if scroll != held {
            replace_staff(host, player, scroll);
            debug!(%player, from = %held, to = %scroll, "staff realigned to scroll");
            Some(held)
        } else {
            None
        };

        let offset = rng.gen_range(0..SUBSET_SIZE);
        let ability = &ability_subset(scroll, state.sneaking)[offset];
        (ability.run)(host, player);
        host.set_action_bar(
            player,
            &ActionBar::Cast {
                element: scroll,
                ability,
            }
            .render(self.style),
        );
        debug!(%player, element = %scroll, ability = ability.name, "ability cast");

        UseOutcome::Cast(CastReport {
            element: scroll,
            index: subset_start(state.sneaking) + offset,
            ability: ability.name,
            category: ability.category,
            sneaking: state.sneaking,
            realigned_from,
        })
    }
}

fn replace_staff(host: &mut dyn GameHost, player: EntityId, element: Element) {
    if let Err(err) = host.set_selected_item(player, ItemStack::staff(element)) {
        trace!(%player, %element, %err, "staff replacement rejected");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::strip_formatting;
    use glam::DVec3;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use wizardiuz_core::{DimensionId, StatusEffectType};
    use wizardiuz_testkit::SandboxWorld;

    const DIM: DimensionId = DimensionId::Overworld;

    fn setup(staff: Element, offhand: Option<ItemStack>, sneaking: bool) -> (SandboxWorld, EntityId) {
        let mut world = SandboxWorld::new();
        let player = world.spawn_player(DIM, DVec3::new(0.0, 64.0, 0.0));
        world.hold(player, ItemStack::staff(staff));
        world.equip_offhand(player, offhand);
        world.set_sneaking(player, sneaking);
        (world, player)
    }

    fn held_staff(world: &SandboxWorld, player: EntityId) -> Option<Element> {
        world
            .player_data(player)
            .and_then(|p| p.selected_item())
            .and_then(|stack| stack.staff_element())
    }

    fn action_bar(world: &SandboxWorld, player: EntityId) -> Option<String> {
        world
            .player_data(player)
            .and_then(|p| p.action_bar.as_deref())
            .map(strip_formatting)
    }

    #[test]
    fn non_staff_items_are_ignored() {
        let (mut world, player) = setup(Element::Fire, None, true);
        let event = ItemUseEvent {
            source: player,
            item: Some(ItemStack::new("minecraft:bow", 1)),
        };
        let outcome =
            CastController::default().on_item_use(&mut world, &mut StdRng::seed_from_u64(1), &event);

        assert_eq!(outcome, UseOutcome::Ignored);
        assert_eq!(held_staff(&world, player), Some(Element::Fire));
        assert_eq!(action_bar(&world, player), None);
    }

    #[test]
    fn missing_item_is_ignored() {
        let (mut world, player) = setup(Element::Fire, None, false);
        let event = ItemUseEvent {
            source: player,
            item: None,
        };
        let outcome =
            CastController::default().on_item_use(&mut world, &mut StdRng::seed_from_u64(1), &event);
        assert_eq!(outcome, UseOutcome::Ignored);
    }

    #[test]
    fn stale_player_is_ignored() {
        let (mut world, player) = setup(Element::Fire, Some(ItemStack::scroll(Element::Water)), false);
        let event = world.use_selected(player);
        world.invalidate(player);

        let outcome =
            CastController::default().on_item_use(&mut world, &mut StdRng::seed_from_u64(1), &event);
        assert_eq!(outcome, UseOutcome::Ignored);
    }

    #[test]
    fn sneaking_without_scroll_switches_one_step() {
        let (mut world, player) = setup(Element::Sand, None, true);
        let event = world.use_selected(player);
        let outcome =
            CastController::default().on_item_use(&mut world, &mut StdRng::seed_from_u64(1), &event);

        assert_eq!(
            outcome,
            UseOutcome::Switched {
                from: Element::Sand,
                to: Element::Hail
            }
        );
        assert_eq!(held_staff(&world, player), Some(Element::Hail));
        assert_eq!(
            action_bar(&world, player).as_deref(),
            Some("Element switched: HAIL")
        );
    }

    #[test]
    fn sneaking_with_unrecognized_offhand_still_switches() {
        let (mut world, player) = setup(
            Element::Hail,
            Some(ItemStack::new("minecraft:shield", 1)),
            true,
        );
        let event = world.use_selected(player);
        let outcome =
            CastController::default().on_item_use(&mut world, &mut StdRng::seed_from_u64(1), &event);

        assert_eq!(
            outcome,
            UseOutcome::Switched {
                from: Element::Hail,
                to: Element::Water
            }
        );
        assert_eq!(held_staff(&world, player), Some(Element::Water));
    }

    #[test]
    fn standing_without_scroll_only_hints() {
        let (mut world, player) = setup(Element::Wind, None, false);
        let event = world.use_selected(player);
        let outcome =
            CastController::default().on_item_use(&mut world, &mut StdRng::seed_from_u64(1), &event);

        assert_eq!(
            outcome,
            UseOutcome::NeedsScroll {
                element: Element::Wind
            }
        );
        assert_eq!(held_staff(&world, player), Some(Element::Wind));
        assert_eq!(
            action_bar(&world, player).as_deref(),
            Some("Offhand a Wizardiuz Scroll to cast abilities.")
        );
        assert_eq!(world.selected_item_writes(player), 0);
    }

    #[test]
    fn matching_scroll_casts_without_replacing_staff() {
        let (mut world, player) = setup(Element::Hail, Some(ItemStack::scroll(Element::Hail)), false);
        let event = world.use_selected(player);
        let outcome =
            CastController::default().on_item_use(&mut world, &mut StdRng::seed_from_u64(3), &event);

        let UseOutcome::Cast(report) = outcome else {
            panic!("expected a cast, got {outcome:?}");
        };
        assert_eq!(report.element, Element::Hail);
        assert_eq!(report.realigned_from, None);
        assert!(report.index < SUBSET_SIZE);
        assert_eq!(world.selected_item_writes(player), 0);
    }

    #[test]
    fn mismatched_scroll_realigns_before_casting() {
        let (mut world, player) = setup(Element::Fire, Some(ItemStack::scroll(Element::Wind)), true);
        let event = world.use_selected(player);
        let outcome =
            CastController::default().on_item_use(&mut world, &mut StdRng::seed_from_u64(9), &event);

        let UseOutcome::Cast(report) = outcome else {
            panic!("expected a cast, got {outcome:?}");
        };
        assert_eq!(report.element, Element::Wind);
        assert_eq!(report.realigned_from, Some(Element::Fire));
        assert!(report.sneaking);
        assert!((SUBSET_SIZE..2 * SUBSET_SIZE).contains(&report.index));
        assert_eq!(held_staff(&world, player), Some(Element::Wind));
        assert_eq!(world.selected_item_writes(player), 1);
        assert_eq!(
            action_bar(&world, player),
            Some(format!("WIND | {} ({})", report.ability, report.category))
        );
    }

    #[test]
    fn scroll_in_offhand_is_never_consumed() {
        let (mut world, player) = setup(Element::Water, Some(ItemStack::scroll(Element::Water)), false);
        let controller = CastController::new(FeedbackStyle::Plain);
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..10 {
            let event = world.use_selected(player);
            controller.on_item_use(&mut world, &mut rng, &event);
        }
        let offhand = world.player_data(player).and_then(|p| p.offhand.clone());
        assert_eq!(offhand, Some(ItemStack::scroll(Element::Water)));
    }

    #[test]
    fn plain_style_reaches_the_host_without_codes() {
        let (mut world, player) = setup(Element::Sand, Some(ItemStack::scroll(Element::Sand)), true);
        let event = world.use_selected(player);
        CastController::new(FeedbackStyle::Plain).on_item_use(
            &mut world,
            &mut StdRng::seed_from_u64(2),
            &event,
        );
        let raw = world
            .player_data(player)
            .and_then(|p| p.action_bar.clone())
            .expect("feedback shown");
        assert!(raw.starts_with("SAND | "));
        assert!(!raw.contains('§'));
    }

    #[test]
    fn cast_applies_the_chosen_ability() {
        let (mut world, player) = setup(Element::Wind, Some(ItemStack::scroll(Element::Wind)), true);
        let event = world.use_selected(player);
        let outcome =
            CastController::default().on_item_use(&mut world, &mut StdRng::seed_from_u64(11), &event);

        let UseOutcome::Cast(report) = outcome else {
            panic!("expected a cast, got {outcome:?}");
        };
        let effects = &world.player_data(player).expect("player").effects;
        match report.ability {
            "Vacuum Spike" => assert!(effects.is_empty()),
            "Pressure Step" => {
                assert!(effects.has(StatusEffectType::Haste));
                assert!(effects.has(StatusEffectType::NightVision));
            }
            "Skyguard" => assert_eq!(effects.amplifier(StatusEffectType::Absorption), Some(2)),
            other => panic!("{other} is not a sneaking wind ability"),
        }
    }
}
