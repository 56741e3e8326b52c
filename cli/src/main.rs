//! shutbox CLI - Command-line driver for the Shut the Box solver
//!
//! Thin demonstration harness: builds the state space, runs value iteration
//! to convergence, and prints utilities and optimal actions for a few
//! showcase positions at dice total 12.

use shutbox_engine::policy::PolicyExtractor;
use shutbox_engine::solver::ValueIterationSolver;
use shutbox_engine::space::StateSpace;
use shutbox_engine::state::{NumberSet, State};
use shutbox_engine::transition::TransitionModel;

fn print_usage() {
    println!("shutbox Solver CLI v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Usage:");
    println!("  shutbox [total_numbers]");
    println!();
    println!("Examples:");
    println!("  shutbox      # solve the standard 1-9 box");
    println!("  shutbox 12   # solve a 12-number box");
}

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let total_numbers: u8 = if args.len() >= 2 {
        match args[1].parse() {
            Ok(n) => n,
            Err(_) => {
                print_usage();
                std::process::exit(1);
            }
        }
    } else {
        9
    };

    let space = match StateSpace::new(total_numbers) {
        Ok(space) => space,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };
    let model = TransitionModel::new();
    let solver = ValueIterationSolver::new();
    let table = solver.solve(&space, &model);
    let extractor = PolicyExtractor::new(&space, &model, &table, &solver);

    // Showcase positions: the untouched box, then the box with the 2 gone,
    // then with the 2 and 4 gone, all at the hardest dice total.
    let full = space.full_set();
    let showcase: [NumberSet; 3] = [full, full.without(2), full.without(2).without(4)];
    let total = 12;

    for remaining in showcase {
        let state = State::new(remaining, total);
        let utility = table
            .utility(&space, &state)
            .expect("showcase state is enumerated");
        println!("Utility of {}, {}: {:.3}", remaining, total, utility);
    }
    for remaining in showcase {
        let state = State::new(remaining, total);
        let actions = extractor
            .policy(&state)
            .expect("showcase state is enumerated");
        let rendered = if actions.is_empty() {
            "give up".to_string()
        } else {
            actions
                .iter()
                .map(|a| a.to_string())
                .collect::<Vec<String>>()
                .join(", ")
        };
        println!("Optimal action of {}, {}: {}", remaining, total, rendered);
    }
}
