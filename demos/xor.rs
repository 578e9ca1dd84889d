use neat_engine::{Config, FeedForwardNetwork, Population};

const CASES: [([f64; 2], f64); 4] = [
    ([0.0, 0.0], 0.0),
    ([0.0, 1.0], 1.0),
    ([1.0, 0.0], 1.0),
    ([1.0, 1.0], 0.0),
];

fn main() {
    env_logger::init();

    let config = Config {
        population_size: 150,
        num_inputs: 2,
        num_outputs: 1,
        ..Config::default()
    };
    let max_generations = config.max_generations;
    let mut population = Population::new(config, rand::thread_rng());

    population.run(
        |genomes| {
            for genome in genomes.iter_mut() {
                let network = FeedForwardNetwork::from_genome(genome).unwrap();
                let mut error = 0.0;
                for (inputs, expected) in CASES {
                    let out = network.activate(&inputs).unwrap()[0];
                    error += (out - expected).powi(2);
                }
                genome.fitness = 4.0 - error;
            }
        },
        max_generations,
    );

    let best = population.best_genome().expect("at least one generation ran");
    println!("best genome {} with fitness {:.4}", best.genome_id, best.fitness);

    let network = FeedForwardNetwork::from_genome(best).unwrap();
    for (inputs, expected) in CASES {
        let out = network.activate(&inputs).unwrap()[0];
        println!("{inputs:?} -> {out:.3} (want {expected})");
    }
}
