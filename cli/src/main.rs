use std::path::PathBuf;

use circuitkit::{
  config::{parse_level, Config, DEFAULT_CONFIG_PATH},
  errors::CircuitkitError,
  Circuitkit,
};
use circuitkit_core::{PrimeName, Protocol};
use clap::{Parser, Subcommand};
use tracing::{debug, info};

#[derive(Parser)]
#[clap(name = "circuitkit")]
#[clap(about = "Compile, prove and verify circom circuits.", long_about = None)]
struct Args {
  #[clap(short, long, global = true, default_value = DEFAULT_CONFIG_PATH)]
  config: PathBuf,

  /// Overrides the config's `logLevel`
  #[clap(short, long, global = true)]
  log_level: Option<String>,

  #[clap(long, global = true)]
  protocol: Option<Protocol>,

  #[clap(long, global = true)]
  prime: Option<PrimeName>,

  #[clap(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Write the main component of a circuit
  Instantiate { circuit: String },
  /// Instantiate and compile a circuit
  Compile { circuit: String },
  /// Print the header of a compiled circuit
  Info {
    circuit: String,
    #[clap(long)]
    json:    bool,
  },
  /// Compute a witness
  Witness { circuit: String, input: String },
  /// Create proving and verification keys
  Setup { circuit: String, ptau: String },
  /// Prove a circuit on an input
  Prove { circuit: String, input: String },
  /// Verify a proof
  Verify { circuit: String, input: String },
  /// Export a Solidity verifier
  Contract { circuit: String },
  /// Encode a proof as verifier calldata
  Calldata {
    circuit: String,
    input:   String,
    #[clap(long)]
    pretty:  bool,
    #[clap(short, long)]
    out:     Option<PathBuf>,
  },
  /// Remove build artifacts
  Clean { circuit: String },
}

fn main() -> Result<(), CircuitkitError> {
  let args = Args::parse();

  let mut config = Config::from_file(&args.config)?;
  if let Some(protocol) = args.protocol {
    config.protocol = protocol;
  }
  if let Some(prime) = args.prime {
    config.prime = prime;
  }
  let log_level = args.log_level.as_deref().map_or_else(|| config.level(), parse_level);
  tracing_subscriber::fmt().with_max_level(log_level).with_line_number(true).init();
  if args.config.exists() {
    debug!("loaded config from {:?}", args.config);
  } else {
    debug!("no config at {:?}, using defaults", args.config);
  }

  let kit = Circuitkit::new(config)?;
  match args.command {
    Command::Instantiate { circuit } => {
      let path = kit.instantiate(&circuit)?;
      println!("{}", path.display());
    },
    Command::Compile { circuit } => {
      let build_dir = kit.compile(&circuit)?;
      println!("{}", build_dir.display());
    },
    Command::Info { circuit, json } => {
      let metadata = kit.info(&circuit)?;
      if json {
        println!("{}", serde_json::to_string_pretty(&metadata)?);
      } else {
        let prime_name = metadata.prime_name.map_or("unknown".to_string(), |p| p.to_string());
        println!("prime:           {} ({})", prime_name, metadata.prime);
        println!("wires:           {}", metadata.wires);
        println!("constraints:     {}", metadata.constraints);
        println!("private inputs:  {}", metadata.private_inputs);
        println!("public inputs:   {}", metadata.public_inputs);
        println!("public outputs:  {}", metadata.public_outputs);
        println!("labels:          {}", metadata.labels);
        println!("custom gates:    {}", metadata.use_custom_gates);
      }
    },
    Command::Witness { circuit, input } => {
      let witness = kit.witness(&circuit, &input)?;
      println!("{}", witness.display());
    },
    Command::Setup { circuit, ptau } => {
      let pkey = kit.setup(&circuit, &ptau)?;
      println!("{}", pkey.display());
    },
    Command::Prove { circuit, input } => {
      let proof = kit.prove(&circuit, &input)?;
      println!("{}", proof.display());
    },
    Command::Verify { circuit, input } =>
      if kit.verify(&circuit, &input)? {
        println!("Verification OK");
      } else {
        println!("Verification failed");
        std::process::exit(1);
      },
    Command::Contract { circuit } => {
      let contract = kit.contract(&circuit)?;
      println!("{}", contract.display());
    },
    Command::Calldata { circuit, input, pretty, out } => {
      let calldata = kit.calldata(&circuit, &input, pretty)?;
      match out {
        Some(out) => {
          std::fs::write(&out, calldata)?;
          info!("calldata written to {:?}", out);
        },
        None => print!("{calldata}"),
      }
    },
    Command::Clean { circuit } => kit.clean(&circuit)?,
  }
  Ok(())
}
