use neat_engine::{Config, FeedForwardNetwork, Genome};

fn main() {
    let config = Config {
        num_inputs: 3,
        num_outputs: 2,
        num_hidden: 1,
        ..Config::default()
    };
    let mut rng = rand::thread_rng();

    let mut genome = Genome::seeded(0, &config, &mut rng);
    genome.mutate(&config, &mut rng);

    println!(
        "genome {} has {} neurons and {} links",
        genome.genome_id,
        genome.neurons().len(),
        genome.links().len()
    );

    let network = FeedForwardNetwork::from_genome(&genome).unwrap();
    let outputs = network.activate(&[0.5, -1.0, 2.0]).unwrap();
    println!("outputs: {outputs:?}");
}
