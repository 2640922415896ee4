use burrow_defence_core::{
    ActionError, BoardSize, CellCoord, CellRect, Command, Event, PlayerInput, TowerId, TowerKind,
};
use burrow_defence_system_builder::Builder;
use burrow_defence_world::{apply, query, World, WorldConfig};

fn builder() -> Builder {
    Builder::new(BoardSize::new(48, 28))
}

fn move_to(builder: &mut Builder, cell: CellCoord) {
    let current = builder.cursor();
    let mut commands = Vec::new();
    let _ = builder.handle(
        PlayerInput::MoveCursor {
            dx: cell.column() as i32 - current.column() as i32,
            dy: cell.row() as i32 - current.row() as i32,
        },
        |_| true,
        &mut commands,
    );
    assert!(commands.is_empty());
}

#[test]
fn place_emits_command_for_selected_kind_at_cursor() {
    let mut builder = builder();
    move_to(&mut builder, CellCoord::new(10, 4));
    let mut commands = Vec::new();

    assert!(builder.handle(PlayerInput::Place, |_| true, &mut commands));

    assert_eq!(
        commands,
        vec![Command::PlaceTower {
            kind: TowerKind::Default,
            origin: CellCoord::new(10, 4),
        }],
        "place should purchase the selected kind at the cursor",
    );
}

#[test]
fn selecting_locked_kind_requests_unlock_first() {
    let mut builder = builder();
    let mut commands = Vec::new();

    assert!(builder.handle(
        PlayerInput::SelectTower {
            kind: TowerKind::Thunder
        },
        |kind| kind == TowerKind::Default,
        &mut commands,
    ));
    assert_eq!(
        commands,
        vec![Command::UnlockTower {
            kind: TowerKind::Thunder
        }]
    );
    assert_eq!(
        builder.selected(),
        TowerKind::Default,
        "selection waits for the unlock to succeed",
    );

    builder.observe(&[Event::TowerUnlocked {
        kind: TowerKind::Thunder,
        cost: TowerKind::Thunder.unlock_cost(),
    }]);
    assert_eq!(builder.selected(), TowerKind::Thunder);
}

#[test]
fn failed_unlock_keeps_previous_selection() {
    let mut builder = builder();
    let mut commands = Vec::new();
    let _ = builder.handle(
        PlayerInput::SelectTower {
            kind: TowerKind::Galactic,
        },
        |_| false,
        &mut commands,
    );
    builder.observe(&[Event::ActionRejected {
        reason: ActionError::InsufficientFunds {
            required: 900,
            available: 90,
        },
    }]);
    builder.observe(&[Event::TowerUnlocked {
        kind: TowerKind::Galactic,
        cost: 900,
    }]);
    assert_eq!(builder.selected(), TowerKind::Default);
}

fn place_commands(builder: &mut Builder) -> Vec<Command> {
    let mut commands = Vec::new();
    let _ = builder.handle(PlayerInput::Place, |_| true, &mut commands);
    commands
}

#[test]
fn place_drops_held_tower_while_holding() {
    let mut builder = builder();
    let cursor = builder.cursor();
    let region = CellRect::square(cursor, 1);
    builder.observe(&[Event::TowerPickedUp {
        tower: TowerId::new(0),
    }]);
    assert_eq!(
        place_commands(&mut builder),
        vec![Command::DropHeldTower { origin: cursor }]
    );

    builder.observe(&[Event::TowerDropped {
        tower: TowerId::new(0),
        region,
    }]);
    assert_eq!(
        place_commands(&mut builder),
        vec![Command::PlaceTower {
            kind: TowerKind::Default,
            origin: cursor,
        }],
        "dropping ends the hold so place purchases again",
    );
}

#[test]
fn cancelled_or_advanced_holds_fall_back_to_purchasing() {
    for release in [
        Event::HoldCancelled {
            tower: TowerId::new(2),
            region: CellRect::square(CellCoord::new(3, 2), 1),
        },
        Event::MapAdvanced { map_index: 1 },
    ] {
        let mut builder = builder();
        builder.observe(&[Event::TowerPickedUp {
            tower: TowerId::new(2),
        }]);
        builder.observe(&[release]);
        assert!(matches!(
            place_commands(&mut builder).as_slice(),
            [Command::PlaceTower { .. }]
        ));
    }
}

#[test]
fn move_held_lifts_then_drops_through_the_world() {
    let mut world = World::with_config(WorldConfig {
        starting_currency: 500,
        ..WorldConfig::default()
    });
    let mut builder = builder();
    let origin = CellCoord::new(3, 2);
    let destination = CellCoord::new(5, 2);
    move_to(&mut builder, origin);

    let mut events = Vec::new();
    let mut run = |builder: &mut Builder, world: &mut World, input: PlayerInput| {
        let mut commands = Vec::new();
        let _ = builder.handle(input, |kind| query::is_unlocked(world, kind), &mut commands);
        events.clear();
        for command in commands {
            apply(world, command, &mut events);
        }
        builder.observe(&events);
        events.clone()
    };

    let placed = run(&mut builder, &mut world, PlayerInput::Place);
    assert!(matches!(placed.as_slice(), [Event::TowerPlaced { .. }]));

    let lifted = run(&mut builder, &mut world, PlayerInput::MoveHeld);
    assert!(matches!(lifted.as_slice(), [Event::TowerPickedUp { .. }]));
    assert!(query::held_tower(&world).is_some());
    assert!(query::tower_view(&world).is_empty());

    move_to(&mut builder, destination);
    let dropped = run(&mut builder, &mut world, PlayerInput::MoveHeld);
    assert!(matches!(dropped.as_slice(), [Event::TowerDropped { .. }]));
    assert!(query::held_tower(&world).is_none());
    assert!(query::tower_at(&world, destination).is_some());
    assert!(query::tower_at(&world, origin).is_none());
}

#[test]
fn sell_and_upgrade_target_the_cursor() {
    let mut builder = builder();
    move_to(&mut builder, CellCoord::new(7, 7));
    let mut commands = Vec::new();
    let _ = builder.handle(PlayerInput::Sell, |_| true, &mut commands);
    let _ = builder.handle(PlayerInput::Upgrade, |_| true, &mut commands);
    let _ = builder.handle(PlayerInput::CancelHold, |_| true, &mut commands);
    let _ = builder.handle(PlayerInput::StartWave, |_| true, &mut commands);
    assert_eq!(
        commands,
        vec![
            Command::SellTower {
                cell: CellCoord::new(7, 7)
            },
            Command::UpgradeTower {
                cell: CellCoord::new(7, 7)
            },
            Command::CancelHold,
            Command::StartWave,
        ]
    );
}
