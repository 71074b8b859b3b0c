//! Canned exchange shown when a display asks for sample data on an empty log

use crate::normalize::{AnalyticalResult, SwotBlock};
use crate::state_machine::{AgentPayload, ConversationMessage};
use chrono::Utc;

const SAMPLE_PROMPT: &str = "What are India's chances if they beat Australia by 30+ runs?";

pub fn sample_result() -> AnalyticalResult {
    AnalyticalResult {
        qualification_probability: "78% -- India needs to win 2 of remaining 3 matches to guarantee a semi-final spot. A single victory combined with favorable NRR could also suffice.".to_string(),
        nrr_impact: "Current NRR of +1.245 is the second-best in the group. A 30+ run victory against Australia would push NRR above +1.5, virtually guaranteeing qualification even with one loss. However, a close defeat could drop NRR below +0.8, making the final match a must-win.".to_string(),
        swot: SwotBlock {
            strengths: "**Batting depth** is exceptional with Rohit, Virat, and Shubman providing a rock-solid top order. **Bowling variety** with Bumrah leading the pace attack and Jadeja offering left-arm spin. **Home conditions knowledge** gives India a significant edge in understanding pitch behavior.".to_string(),
            weaknesses: "**Middle-order consistency** remains a concern with positions 4-6 sometimes struggling under pressure. **Death bowling** has leaked runs in recent matches, especially in the 45-50 over phase. **Over-reliance on top 3** could be exposed against quality new-ball attacks.".to_string(),
            opportunities: "**Favorable remaining schedule** with two home games provides the best chance to accumulate points. **Other results going India's way** -- if England loses to South Africa, India's qualification becomes nearly certain with just one more win.".to_string(),
            threats: "**Australia's pace battery** poses the biggest challenge in the next match. **Weather disruptions** could result in washed-out games that deny crucial points. **Injury concerns** around key players could disrupt the winning combination.".to_string(),
        },
        strategy_recommendations: vec![
            "Prioritize aggressive batting in powerplay overs against Australia to build an early NRR-boosting total -- target 60+ in the first 10 overs.".to_string(),
            "Rest key fast bowlers strategically across remaining games to ensure peak fitness for the knockout stage.".to_string(),
            "Deploy a spin-heavy attack in home conditions, using 3 spinners to exploit turning tracks and apply scoreboard pressure.".to_string(),
            "Bat first whenever possible to set imposing totals that protect and improve the Net Run Rate.".to_string(),
        ],
        scenario_outlook: "India's path to the semi-finals is clear but requires strategic execution. Winning against Australia in the next match would almost clinch qualification with a game to spare. Even a loss can be absorbed if India wins the final group game against Bangladesh, provided NRR stays above +0.9. The ideal scenario: beat Australia by 30+ runs, rest players against South Africa if points are secure, then enter knockouts at full strength.".to_string(),
        summary: "India are in a commanding position at #2 in the group with 8 points and a stellar NRR of +1.245! Two more wins and the semi-final spot is locked -- and with the form Bumrah and Rohit are in, the championship trophy is well within reach. The Blue Army marches on!".to_string(),
    }
}

/// One user question and its parsed answer, stamped now
pub fn sample_messages() -> Vec<ConversationMessage> {
    let now = Utc::now();
    vec![
        ConversationMessage::User {
            id: "sample-1".to_string(),
            text: SAMPLE_PROMPT.to_string(),
            timestamp: now,
        },
        ConversationMessage::Agent {
            id: "sample-2".to_string(),
            timestamp: now,
            payload: AgentPayload::Parsed(sample_result()),
        },
    ]
}
