//! Parameter automation across threads and blocks.

mod helpers;

use std::sync::Arc;
use std::thread;

use helpers::RecordingChip;
use ottavo::chip::{ChannelParam, OperatorParam};
use ottavo::prelude::*;

fn render(engine: &mut OttavoEngine<RecordingChip>) {
    let mut left = [0.0f32; 64];
    let mut right = [0.0f32; 64];
    engine.process_block(&mut left, &mut right);
}

#[test]
fn automation_lands_on_the_interval() {
    let mut engine = OttavoEngineBuilder::new()
        .param_update_interval(4)
        .build(RecordingChip::default())
        .unwrap();
    let params = engine.params();

    params.set(ParamTarget::Operator(0, OperatorParam::TotalLevel), 1.0);

    // Blocks 1-3: nothing applied
    for _ in 0..3 {
        render(&mut engine);
        assert_ne!(engine.dispatcher().registers().read(0x60), 127);
    }
    // Block 4: cadence hit
    render(&mut engine);
    assert_eq!(engine.dispatcher().registers().read(0x60), 127);
}

#[test]
fn channel_parameter_fans_out_to_all_channels() {
    let mut engine = OttavoEngineBuilder::new()
        .param_update_interval(1)
        .build(RecordingChip::default())
        .unwrap();
    let params = engine.params();

    params.set(ParamTarget::Channel(ChannelParam::Algorithm), 1.0);
    render(&mut engine);

    for ch in 0..8u8 {
        let value = engine.dispatcher().registers().read(0x20 + ch);
        assert_eq!(value & 0x07, 7, "channel {ch}");
    }
}

#[test]
fn coalescing_keeps_only_the_last_value() {
    let mut engine = OttavoEngineBuilder::new()
        .param_update_interval(1)
        .build(RecordingChip::default())
        .unwrap();
    let params = engine.params();

    // Rapid automation between blocks: intermediate values are droppable
    for step in 0..100 {
        params.set(
            ParamTarget::Operator(3, OperatorParam::TotalLevel),
            step as f32 / 100.0,
        );
    }
    let writes_before = engine.dispatcher().chip().writes.len();
    render(&mut engine);
    let writes_after = engine.dispatcher().chip().writes.len();

    // One application across 8 channels, not 100
    assert_eq!(writes_after - writes_before, 8);
    // Logical operator 3 (C2) lives at slot offset 24
    let encoded = engine.dispatcher().registers().read(0x60 + 24);
    assert_eq!(encoded, (0.99f32 * 127.0).round() as u8);
}

#[test]
fn automation_thread_cannot_poison_the_audio_thread() {
    let mut engine = OttavoEngineBuilder::new()
        .param_update_interval(1)
        .build(RecordingChip::default())
        .unwrap();
    let params = engine.params();

    let writer = {
        let params: Arc<_> = Arc::clone(&params);
        thread::spawn(move || {
            for step in 0..1000 {
                params.set(
                    ParamTarget::Operator(0, OperatorParam::AttackRate),
                    (step % 32) as f32 / 31.0,
                );
            }
        })
    };

    // Audio thread keeps rendering while the writer hammers the slot
    for _ in 0..50 {
        render(&mut engine);
    }
    writer.join().unwrap();
    render(&mut engine);

    // Whatever value won, it is in range and consistent across channels
    let attack = engine.dispatcher().registers().read(0x80) & 0x1F;
    for ch in 0..8u8 {
        assert_eq!(engine.dispatcher().registers().read(0x80 + ch) & 0x1F, attack);
    }
}

#[test]
fn pitch_bend_range_is_automatable() {
    let mut engine = OttavoEngineBuilder::new()
        .param_update_interval(1)
        .build(RecordingChip::default())
        .unwrap();
    let params = engine.params();
    let midi = engine.midi_sender();

    params.set(ParamTarget::PitchBendRange, 1.0); // 12 semitones
    render(&mut engine);

    midi.push(MidiEvent::pitch_bend(0, 0, 16383));
    render(&mut engine);

    assert!(engine.dispatcher().pitch_bend_semitones() > 11.0);
}

#[test]
fn noise_frequency_automation_preserves_enable_bit() {
    let patch = Patch {
        noise: ottavo::synth::NoiseConfig {
            enabled: true,
            frequency: 0,
        },
        ..Patch::default()
    };
    let mut engine = OttavoEngineBuilder::new()
        .patch(patch)
        .param_update_interval(1)
        .build(RecordingChip::default())
        .unwrap();
    let params = engine.params();

    params.set(ParamTarget::NoiseFrequency, 1.0);
    render(&mut engine);

    let noise = engine.dispatcher().registers().read(0x0F);
    assert_eq!(noise & 0x80, 0x80, "enable bit must survive");
    assert_eq!(noise & 0x1F, 31);
}
