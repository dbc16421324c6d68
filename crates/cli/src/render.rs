//! Narrated text output.

use console::{StyledObject, style};

use duel_core::{BattleResult, Element, ElementMatrix, RoundEvent, Side};
use duel_runtime::{BattleReport, SweepSummary};

fn side_name(names: &[String; 2], side: Side) -> StyledObject<&str> {
    let name = names[side.index()].as_str();
    match side {
        Side::One => style(name).blue().bold(),
        Side::Two => style(name).red().bold(),
    }
}

/// Prints a battle round by round.
pub fn print_battle(report: &BattleReport, names: &[String; 2]) {
    let result = &report.result;
    println!(
        "{} {} vs {} (seed {})",
        style("Battle").bold(),
        side_name(names, Side::One),
        side_name(names, Side::Two),
        result.seed
    );

    for turn in &result.turns {
        println!();
        println!("{}", style(format!("Round {}", turn.round)).cyan().bold());
        for event in &turn.events {
            let line = format!("  {} {}", side_name(names, event.side()), event);
            match event {
                RoundEvent::KnockedOut { .. } => println!("{}", style(line).bold()),
                RoundEvent::StatusTick { .. } | RoundEvent::StatusApplied { .. } => {
                    println!("{}", style(line).magenta())
                }
                _ => println!("{}", line),
            }
        }
        println!(
            "  {}",
            style(format!(
                "HP {} / {}",
                turn.hp_after[0], turn.hp_after[1]
            ))
            .dim()
        );
    }

    println!();
    print_progression(result);
    print_outcome(result, names);
    println!("{} {}", style("digest").dim(), style(&report.digest).dim());
}

fn print_progression(result: &BattleResult) {
    for gift in &result.stat_gifts {
        println!(
            "{} {} receives +{} {} (kill #{})",
            style("GIFT").green().bold(),
            gift.combatant,
            gift.amount,
            gift.stat,
            gift.kill_milestone
        );
    }
    for evolution in &result.evolutions {
        println!(
            "{} {} {} (stage {}, {} kills)",
            style("EVOLVED").yellow().bold(),
            evolution.combatant,
            evolution.narrative(),
            evolution.new_stage,
            evolution.kill_milestone
        );
    }
}

fn print_outcome(result: &BattleResult, names: &[String; 2]) {
    let how = if result.knockout_by.is_some() {
        "by knockout"
    } else {
        "on HP at the round cap"
    };
    match result.winner_side {
        Some(side) => println!(
            "{} {} wins {} after {} rounds ({:.1}% HP left)",
            style("RESULT").green().bold(),
            side_name(names, side),
            how,
            result.rounds,
            result.final_hp_pct(side)
        ),
        None => println!(
            "{} draw after {} rounds ({:.1}% vs {:.1}%)",
            style("RESULT").yellow().bold(),
            result.rounds,
            result.side_one_final_hp_pct,
            result.side_two_final_hp_pct
        ),
    }
}

/// Prints a sweep tally.
pub fn print_summary(summary: &SweepSummary, names: &[String; 2]) {
    println!(
        "{} {} vs {} over {} battles",
        style("Sweep").bold(),
        side_name(names, Side::One),
        side_name(names, Side::Two),
        summary.battles
    );
    for side in Side::ALL {
        println!(
            "  {:<24} {:>5} wins  {:>5.1}%",
            names[side.index()],
            summary.wins[side.index()],
            summary.win_rate(side) * 100.0
        );
    }
    println!("  {:<24} {:>5}", "draws", summary.draws);
    println!(
        "  {:<24} {:>5}  timeouts {}",
        "knockouts", summary.knockouts, summary.timeouts
    );
    println!(
        "  {:<24} {:>5.1}  longest {}",
        "average rounds",
        summary.avg_rounds(),
        summary.longest
    );
}

/// Prints the advantage cycle and the attacker/defender multiplier table.
pub fn print_elements(matrix: &ElementMatrix) {
    let mut cycle = vec![Element::Volt.as_str()];
    let mut next = Element::Volt.beats();
    while next != Element::Volt {
        cycle.push(next.as_str());
        next = next.beats();
    }
    println!(
        "{} {} > {}",
        style("Cycle").bold(),
        cycle.join(" > "),
        Element::Volt
    );
    println!();

    print!("{:<6}", "");
    for defender in Element::ALL {
        print!("{:>7}", defender.as_str());
    }
    println!();

    let table = matrix.table();
    for attacker in Element::ALL {
        print!("{:<6}", attacker.as_str());
        for defender in Element::ALL {
            let value = table[attacker.index()][defender.index()];
            let cell = format!("{:>7.2}", value);
            if value > ElementMatrix::NEUTRAL {
                print!("{}", style(cell).green());
            } else if value < ElementMatrix::NEUTRAL {
                print!("{}", style(cell).red());
            } else {
                print!("{}", style(cell).dim());
            }
        }
        println!();
    }
}
