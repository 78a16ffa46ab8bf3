//! End-to-end session tests: scripted radio traffic in, display events out.

use lumen_beacon::{bucket_index, BeaconId, Blake3Oracle, HashOracle, HashVector};
use lumen_engine::{Engine, EngineEvent, NoInput, ScanConfig};
use lumen_leveling::LevelingConfig;
use lumen_radio::{Beacon, ScriptedTransport};

const LOCAL_ID: u32 = 0x1055_c0de;

fn frame(raw_id: u32, sequence: u32) -> Vec<u8> {
    Beacon { id: BeaconId::new(raw_id), sequence }.encode().to_vec()
}

fn engine_with_ticks(confirm_ticks: u32) -> Engine<Blake3Oracle> {
    Engine::with_config(
        Blake3Oracle,
        BeaconId::new(LOCAL_ID),
        ScanConfig::default(),
        LevelingConfig { confirm_ticks, ..Default::default() },
    )
}

/// Raw ids whose beacon hash lands in `bucket` relative to the local id.
fn ids_in_bucket(bucket: usize, count: usize) -> Vec<u32> {
    let oracle = Blake3Oracle;
    let local = HashVector::derive(&oracle, BeaconId::new(LOCAL_ID)).beacon_hash();
    let mut found = Vec::new();
    let mut raw = 1u32;
    while found.len() < count {
        let peer = HashVector::derive(&oracle, BeaconId::new(raw)).beacon_hash();
        if bucket_index(local, peer) == bucket && peer != local {
            found.push(raw);
        }
        raw += 1;
    }
    found
}

/// Drive an uninterrupted gesture to completion and return its events.
fn run_gesture(engine: &mut Engine<Blake3Oracle>, max_ticks: u32) -> Vec<EngineEvent> {
    for _ in 0..max_ticks {
        let events = engine.tick(&mut NoInput);
        if !events.is_empty() {
            return events;
        }
    }
    panic!("gesture never completed within {} ticks", max_ticks);
}

#[test]
fn crowd_session_converges_and_reports() {
    let mut engine = Engine::new(Blake3Oracle, BeaconId::new(LOCAL_ID));
    let mut transport = ScriptedTransport::new();

    // A mixed crowd: 40 badges plus interleaved foreign traffic.
    for raw in 1..=40u32 {
        transport.push(frame(raw, raw));
        if raw % 7 == 0 {
            transport.push(vec![0xaau8; 11]);
        }
    }

    let events = engine.scan_burst(&mut transport, &mut NoInput);

    let snapshot = events
        .iter()
        .find_map(|e| match e {
            EngineEvent::Redraw(s) => Some(s.clone()),
            _ => None,
        })
        .expect("burst with traffic must redraw");

    assert!(snapshot.estimate > 1, "estimate {} stuck at alone", snapshot.estimate);
    assert!(snapshot.estimate < 1000, "estimate {} implausible for 40 badges", snapshot.estimate);

    let machine_total: usize = snapshot.machine_occupancy.0.iter().map(|&c| c as usize).sum();
    assert!(machine_total >= 1);
    // Nothing confirmed without a gesture.
    assert!(snapshot.confirmed_occupancy.0.iter().all(|&c| c == 0));
    assert!(!snapshot.recent.is_empty());
    assert_eq!(snapshot.award_visual, None);

    // No faults ever: the bucket range is guaranteed by construction.
    assert!(!events.iter().any(|e| matches!(e, EngineEvent::Fault { .. })));
}

#[test]
fn completed_gesture_awards_and_flashes() {
    let mut engine = engine_with_ticks(3);
    let peer = ids_in_bucket(6, 1)[0];

    let mut transport = ScriptedTransport::new();
    transport.push(frame(peer, 1));
    engine.scan_burst(&mut transport, &mut NoInput);
    assert!(engine.session().leveler().attempt().is_some(), "gate should open");

    let events = run_gesture(&mut engine, 10);

    assert!(matches!(&events[0], EngineEvent::Award(award) if award.bucket == 6));
    let EngineEvent::Redraw(ref snapshot) = events[1] else {
        panic!("confirmation must redraw, got {:?}", events[1]);
    };
    assert_eq!(snapshot.award_visual, Some(6));
    assert_eq!(snapshot.confirmed_occupancy.0[6], 1);
    assert!(matches!(events[2], EngineEvent::Attention));

    assert!(engine.attention_pending());
    engine.acknowledge_attention();
    assert!(!engine.attention_pending());
}

#[test]
fn cancelled_gesture_leaves_no_trace() {
    let mut engine = engine_with_ticks(40);
    let peer = ids_in_bucket(4, 1)[0];

    let mut transport = ScriptedTransport::new();
    transport.push(frame(peer, 1));
    engine.scan_burst(&mut transport, &mut NoInput);

    // Hold the gesture for a while, then cancel one tick short of done.
    for _ in 0..39 {
        assert!(engine.tick(&mut NoInput).is_empty());
    }
    let mut cancel = || true;
    let events = engine.tick(&mut cancel);

    assert!(events.is_empty(), "cancellation is silent: {:?}", events);
    assert_eq!(engine.session().leveler().confirmed().occupancy(4), 0);
    assert!(engine.session().leveler().attempt().is_none());
    assert!(!engine.attention_pending());
}

#[test]
fn full_confirmed_bucket_stops_awarding() {
    let mut engine = engine_with_ticks(1);
    let bucket = 3;
    let peers = ids_in_bucket(bucket, 3);

    // Confirm two peers into the same bucket, one gesture each.
    for &peer in &peers[..2] {
        let mut transport = ScriptedTransport::new();
        transport.push(frame(peer, 1));
        engine.scan_burst(&mut transport, &mut NoInput);
        let events = run_gesture(&mut engine, 5);
        assert!(events.iter().any(|e| matches!(e, EngineEvent::Award(_))));
        engine.acknowledge_attention();
    }
    assert_eq!(engine.session().leveler().confirmed().occupancy(bucket), 2);

    // The third peer is heard but the gate stays shut.
    let mut transport = ScriptedTransport::new();
    transport.push(frame(peers[2], 1));
    engine.scan_burst(&mut transport, &mut NoInput);

    assert!(engine.session().leveler().attempt().is_none(), "full bucket must refuse");
    assert!(engine.tick(&mut NoInput).is_empty());
    assert_eq!(engine.session().leveler().confirmed().occupancy(bucket), 2);
    // The machine table still tracked the sighting.
    assert!(engine.session().sightings().occupancy(bucket) >= 1);
}

#[test]
fn reheard_peer_does_not_reopen_the_gate() {
    let mut engine = engine_with_ticks(1);
    let peer = ids_in_bucket(8, 1)[0];

    let mut transport = ScriptedTransport::new();
    transport.push(frame(peer, 1));
    engine.scan_burst(&mut transport, &mut NoInput);
    run_gesture(&mut engine, 5);
    engine.acknowledge_attention();

    // Same badge again: already confirmed, nothing pending.
    let mut transport = ScriptedTransport::new();
    transport.push(frame(peer, 2));
    engine.scan_burst(&mut transport, &mut NoInput);
    assert!(engine.session().leveler().attempt().is_none());
    assert_eq!(engine.session().leveler().confirmed().occupancy(8), 1);
}

#[test]
fn snapshots_ship_as_json() {
    let mut engine = Engine::new(Blake3Oracle, BeaconId::new(LOCAL_ID));
    let mut transport = ScriptedTransport::new();
    for raw in 1..=3u32 {
        transport.push(frame(raw, raw));
    }
    engine.scan_burst(&mut transport, &mut NoInput);

    let snapshot = engine.snapshot();
    let json = serde_json::to_string(&snapshot).expect("snapshot must serialize");
    let back: lumen_engine::DisplaySnapshot =
        serde_json::from_str(&json).expect("snapshot must deserialize");
    assert_eq!(back, snapshot);
}

#[test]
fn oracle_seam_accepts_test_doubles() {
    // A fixed oracle pins every badge to the same vector: the engine
    // must treat that as one very close crowd, not crash.
    struct ConstantOracle;
    impl HashOracle for ConstantOracle {
        fn hash16(&self, _salt: u32, _id: BeaconId) -> u16 {
            0x4242
        }
    }

    let mut engine = Engine::new(ConstantOracle, BeaconId::new(LOCAL_ID));
    let mut transport = ScriptedTransport::new();
    transport.push(frame(77, 1));

    let events = engine.scan_burst(&mut transport, &mut NoInput);
    assert!(events.iter().any(|e| matches!(e, EngineEvent::Redraw(_))));
    assert_eq!(engine.estimate(), lumen_estimate::ESTIMATE_CEILING);
}
