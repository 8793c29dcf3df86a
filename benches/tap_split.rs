use std::hint::black_box;
use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use msfc_ccd_rs::ccd::{
    BiasRegion, FrameHeader, HeaderRecord, ImageAxes, SensorFrame, SplitConfig, recombine, split,
    teledyne_ccd230,
};
use msfc_ccd_rs::ccd::units::{Duration, Temperature, TemperatureExt, TimeExt, Voltage, VoltageExt};
use ndarray::{ArrayD, IxDyn};

fn header() -> FrameHeader {
    FrameHeader::uniform(HeaderRecord {
        time: chrono::Utc::now(),
        timedelta: Duration::from_seconds(10.0),
        timedelta_requested: Duration::from_seconds(10.0),
        serial_number: None,
        run_mode: None,
        status: None,
        voltage_fpga_vccint: Voltage::from_volts(1.0),
        voltage_fpga_vccaux: Voltage::from_volts(1.8),
        voltage_fpga_vccbram: Voltage::from_volts(1.0),
        temperature_fpga: Temperature::from_celsius(25.0),
        temperature_adc_1: Temperature::from_celsius(25.0),
        temperature_adc_2: Temperature::from_celsius(25.0),
        temperature_adc_3: Temperature::from_celsius(25.0),
        temperature_adc_4: Temperature::from_celsius(25.0),
    })
}

fn generate_mock_frame(num_frames: usize) -> SensorFrame {
    let geometry = teledyne_ccd230();
    let num_x = geometry.num_pixel_x.unwrap_or(2152);
    let num_y = geometry.num_pixel_y.unwrap_or(2048);
    let data = ArrayD::from_shape_fn(IxDyn(&[num_frames, num_y, num_x]), |i| {
        ((i[1] + i[2]) % 4096) as f64
    });
    SensorFrame::from_parts(
        data,
        header(),
        Arc::new(geometry),
        ImageAxes::default().with_batch(["time"]),
    )
    .expect("benchmark frame is valid")
}

fn benchmark_split_recombine(c: &mut Criterion) {
    let mut group = c.benchmark_group("split_recombine");
    group.sample_size(20);

    for num_frames in [1, 4] {
        let frame = generate_mock_frame(num_frames);
        let config = SplitConfig::default();

        group.bench_with_input(BenchmarkId::new("split", num_frames), &frame, |b, frame| {
            b.iter(|| split(black_box(frame), &config));
        });

        let taps = split(&frame, &config).expect("benchmark frame splits");
        group.bench_with_input(BenchmarkId::new("recombine", num_frames), &taps, |b, taps| {
            b.iter(|| recombine(black_box(taps)));
        });
    }

    group.finish();
}

fn benchmark_debias(c: &mut Criterion) {
    let mut group = c.benchmark_group("debias");
    group.sample_size(20);

    let frame = generate_mock_frame(1);
    let config = SplitConfig::default();
    let taps = split(&frame, &config).expect("benchmark frame splits");

    let regions = [
        (BiasRegion::default(), "overscan"),
        (BiasRegion::new(None, None), "blank_and_overscan"),
    ];
    for (region, label) in regions {
        group.bench_with_input(BenchmarkId::new("taps", label), &region, |b, region| {
            b.iter(|| taps.unbiased_with(black_box(region)));
        });
    }

    group.bench_function("sensor_frame", |b| {
        b.iter(|| black_box(&frame).unbiased());
    });

    group.finish();
}

criterion_group!(benches, benchmark_split_recombine, benchmark_debias);
criterion_main!(benches);
