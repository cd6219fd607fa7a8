//! Property-based tests for partitioning and the block codecs.

mod common;

use common::averaging_codebook;
use htvq::{
    BlockPipeline, CodecConfig, HtvqDecoder, HtvqEncoder, Matrix, ParallelPipeline,
    PartitionConfig, Partitioner, SequentialPipeline, Stage4Pairing, VqEncoder,
};
use proptest::prelude::*;

const BLOCK_SHAPES: [(usize, usize); 5] = [(2, 1), (2, 2), (4, 2), (4, 4), (8, 4)];

/// Grid shape, block shape and matching pixel data
fn partitioned_image() -> impl Strategy<Value = (PartitionConfig, Vec<i32>)> {
    (1usize..6, 1usize..6, 1usize..5, 1usize..5).prop_flat_map(
        |(grid_rows, grid_columns, partition_rows, partition_columns)| {
            let config = PartitionConfig {
                image_rows: grid_rows * partition_rows,
                image_columns: grid_columns * partition_columns,
                partition_rows,
                partition_columns,
            };
            let len = config.image_rows * config.image_columns;
            (Just(config), prop::collection::vec(-1000i32..1000, len))
        },
    )
}

/// Block shape index and pixels for that shape
fn block() -> impl Strategy<Value = (usize, usize, Vec<i32>)> {
    (0..BLOCK_SHAPES.len()).prop_flat_map(|i| {
        let (width, height) = BLOCK_SHAPES[i];
        (Just(width), Just(height), prop::collection::vec(0i32..=255, width * height))
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_unpartition_inverts_partition((config, data) in partitioned_image()) {
        let image = Matrix::from_vec(config.image_rows, config.image_columns, data).unwrap();
        let partitioner = Partitioner::new(config).unwrap();

        let blocks = partitioner.partition(&image).unwrap();
        prop_assert_eq!(blocks.len(), partitioner.block_count());
        for b in &blocks {
            prop_assert_eq!(b.dims(), (config.partition_rows, config.partition_columns));
        }

        prop_assert_eq!(partitioner.unpartition(&blocks).unwrap(), image);
    }

    #[test]
    fn prop_first_block_is_top_left((config, data) in partitioned_image()) {
        let image = Matrix::from_vec(config.image_rows, config.image_columns, data).unwrap();
        let blocks = Partitioner::new(config).unwrap().partition(&image).unwrap();

        for r in 0..config.partition_rows {
            for c in 0..config.partition_columns {
                prop_assert_eq!(blocks[0][(r, c)], image[(r, c)]);
            }
        }
    }

    #[test]
    fn prop_encode_is_deterministic((width, height, pixels) in block()) {
        let codebook = averaging_codebook();
        let encoder = HtvqEncoder::new(&codebook);
        let first = encoder.encode(&pixels, width, height).unwrap();
        prop_assert_eq!(encoder.encode(&pixels, width, height).unwrap(), first);
    }

    #[test]
    fn prop_decode_matches_block_shape((width, height, pixels) in block()) {
        let codebook = averaging_codebook();
        let codeword = HtvqEncoder::new(&codebook).encode(&pixels, width, height).unwrap();
        let decoded = HtvqDecoder::new(&codebook).decode(codeword, width, height).unwrap();
        prop_assert_eq!(decoded.dims(), (height, width));
        prop_assert!(decoded.as_slice().iter().all(|&v| (0..=255).contains(&v)));
    }

    #[test]
    fn prop_pairing_only_matters_for_largest_blocks((width, height, pixels) in block()) {
        prop_assume!(width * height < 32);
        let codebook = averaging_codebook();
        let reference = HtvqEncoder::new(&codebook);
        let corrected = HtvqEncoder::new(&codebook).with_pairing(Stage4Pairing::Corrected);
        prop_assert_eq!(
            reference.encode(&pixels, width, height).unwrap(),
            corrected.encode(&pixels, width, height).unwrap()
        );
    }

    #[test]
    fn prop_uniform_blocks_agree(shape in 0..BLOCK_SHAPES.len(), value in 0i32..=255) {
        let (width, height) = BLOCK_SHAPES[shape];
        let codebook = averaging_codebook();
        let pixels = vec![value; width * height];

        let htvq = HtvqEncoder::new(&codebook).encode(&pixels, width, height).unwrap();
        let vq = VqEncoder::new(&codebook).encode(&pixels, width, height).unwrap();
        prop_assert_eq!(htvq, vq);
        prop_assert_eq!(htvq as i32, value);
    }

    #[test]
    fn prop_near_uniform_blocks_differ_by_at_most_one(
        base in 0i32..255,
        offsets in prop::collection::vec(0i32..=1, 4),
    ) {
        let codebook = averaging_codebook();
        let pixels: Vec<i32> = offsets.iter().map(|&d| base + d).collect();

        let htvq = HtvqEncoder::new(&codebook).encode(&pixels, 2, 2).unwrap();
        let vq = VqEncoder::new(&codebook).encode(&pixels, 2, 2).unwrap();
        prop_assert!((htvq as i32 - vq as i32).abs() <= 1);
    }

    #[test]
    fn prop_brute_force_is_never_worse((width, height, pixels) in block()) {
        let codebook = averaging_codebook();
        let decoder = HtvqDecoder::new(&codebook);
        let error = |cw| {
            let decoded = decoder.decode(cw, width, height).unwrap();
            pixels
                .iter()
                .zip(decoded.as_slice())
                .map(|(&a, &b)| ((a - b) * (a - b)) as u64)
                .sum::<u64>()
        };

        let htvq = HtvqEncoder::new(&codebook).encode(&pixels, width, height).unwrap();
        let vq = VqEncoder::new(&codebook).encode(&pixels, width, height).unwrap();
        prop_assert!(error(vq) <= error(htvq));
    }

    #[test]
    fn prop_parallel_matches_sequential(
        seeds in prop::collection::vec(any::<u8>(), 0..80),
        block_count in 1usize..10,
        threads in 2usize..6,
    ) {
        let codebook = averaging_codebook();
        let encoder = HtvqEncoder::new(&codebook);
        let blocks: Vec<Matrix> = seeds
            .iter()
            .map(|&s| {
                let v = s as i32;
                Matrix::from_rows(&[[v, 255 - v], [v / 2, 255]]).unwrap()
            })
            .collect();

        let config = CodecConfig { block_count, ..Default::default() };
        let sequential = SequentialPipeline::new(config.clone()).encode_blocks(&encoder, &blocks).unwrap();
        let parallel = ParallelPipeline::new(CodecConfig { num_threads: threads, ..config })
            .encode_blocks(&encoder, &blocks)
            .unwrap();
        prop_assert_eq!(sequential, parallel);
    }
}
