//! Rule-based chat replies.
//!
//! Replies may contain simple markup (`<b>`, `<br>`, `<ul>`) for the client to
//! render. Values supplied by the client are escaped before being embedded.

use std::sync::Arc;

use ewaste_core::{DisposalRecord, KnowledgeBase};

use crate::context::ChatContext;
use crate::intent::{Intent, Normalized, RULES, detect_with};

const SUMMARY_STEPS: usize = 3;

const NEEDS_IMAGE: &str = "I don't know which item you mean yet. Please upload a photo of the item first, \
and then ask me again so I can tell you how to dispose of it safely.";

const GREETING: &str = "Hello! 😊 I am your e-waste assistant. You can upload an image of an electronic item \
and ask me how to dispose of it safely.";

const THANKS: &str = "You're welcome! ♻️ If you have more questions about e-waste or another item, just ask.";

const CAPABILITIES: &str = "I am an e-waste assistant chatbot. I can:<br>\
- Identify many electronic items from an image (like battery, mobile, printer, TV, etc.)<br>\
- Tell you how to dispose of them safely<br>\
- Explain why e-waste is dangerous<br>\
- Help you find nearby recycling centres using Google Maps.";

const OFF_TOPIC: &str = "Sorry, I'm just an e-waste chatbot 😅.<br>\
I can help you identify electronics and dispose of them safely.<br><br>\
For other questions, please try a general-purpose assistant.";

const WHAT_IS_EWASTE: &str = "E-waste (electronic waste) is any discarded electrical or electronic item, such as \
mobiles, laptops, TVs, batteries, chargers and printers. These items contain metals, plastics and chemicals that \
can pollute soil and water and harm human health if they are dumped or burnt instead of being recycled properly.";

const WHY_DANGEROUS: &str = "E-waste is dangerous because it often contains hazardous substances like lead, \
mercury, cadmium and brominated flame retardants. If e-waste is thrown in normal dustbins, dumped or burnt, these \
substances can leak into the air, soil and water. This can cause health problems (like nerve damage and cancers) \
and long-term environmental damage.";

const DUSTBIN: &str = "Electronic items should not be thrown in the normal dustbin. They contain metals, chemicals \
and sometimes batteries that can leak or catch fire. Instead, always hand over e-waste to an authorised e-waste \
collection centre or recycler so that useful materials can be recovered safely.";

const EXAMPLES: &str = "Common examples of e-waste include:<br>\
- Mobile phones, tablets, laptops, computers<br>\
- Keyboards, mice, chargers, cables, earphones<br>\
- Televisions, printers, scanners, media players<br>\
- Microwaves, washing machines and other appliances with electronics<br>\
- Batteries and circuit boards (PCBs)<br>\
All of these should be sent to e-waste recyclers instead of normal dustbins.";

const NEAREST_CENTRE: &str = "You can use the 'Find nearest recycling centre' link I provide after analyzing an \
image. It opens Google Maps with nearby e-waste recycling or collection centres. You can also search Google Maps \
for 'e-waste recycling centre' or 'battery recycling' in your city.";

const ITEM_HINT: &str = "I may not fully understand the exact question, but I can help with e-waste disposal. \
Try asking things like:<br>\
- How do I dispose of this item?<br>\
- Is it safe to throw this in the dustbin?<br>\
- Why is e-waste dangerous?<br>\
You can also upload an image if you want me to detect a specific product.";

const FALLBACK: &str = "Sorry, I am mainly designed to talk about e-waste and electronic items. Please upload an \
image of an electronic product (like a battery, mobile, printer, TV, etc.) and then ask me how to dispose of it \
safely.";

/// A reply together with the intent that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub intent: Intent,
    pub text: String,
    /// The context named an item known to the knowledge base.
    pub has_context: bool,
}

/// Previously detected item resolved against the knowledge base.
struct Item<'a> {
    name: String,
    record: &'a DisposalRecord,
}

/// Stateless single-turn responder. Never fails.
#[derive(Debug, Clone)]
pub struct ChatResponder {
    kb: Arc<KnowledgeBase>,
}

impl ChatResponder {
    pub fn new(kb: Arc<KnowledgeBase>) -> Self {
        Self { kb }
    }

    pub fn respond(&self, message: &str, context: &ChatContext) -> String {
        self.reply(message, context).text
    }

    pub fn reply(&self, message: &str, context: &ChatContext) -> Reply {
        let intent = detect_with(RULES, &Normalized::new(message));
        let item = self.resolve_item(context);
        let text = match (intent, &item) {
            (Intent::Greeting, Some(item)) => greeting_reply(&item.name),
            // Greeting only needs a name, not a resolvable class.
            (Intent::Greeting, None) => match context.last_name() {
                Some(name) => greeting_reply(&escape_html(name)),
                None => GREETING.to_string(),
            },
            (Intent::Thanks, _) => THANKS.to_string(),
            (Intent::Capabilities, _) => CAPABILITIES.to_string(),
            (Intent::OffTopic, _) => OFF_TOPIC.to_string(),
            (Intent::WhatIsEwaste, _) => WHAT_IS_EWASTE.to_string(),
            (Intent::WhyDangerous, _) => WHY_DANGEROUS.to_string(),
            (Intent::Dustbin, _) => DUSTBIN.to_string(),
            (Intent::Examples, _) => EXAMPLES.to_string(),
            (Intent::NearestCentre, _) => NEAREST_CENTRE.to_string(),
            (i, None) if i.needs_item_context() => NEEDS_IMAGE.to_string(),
            (Intent::DisposalSteps, Some(item)) => disposal_reply(item),
            (Intent::Hazards, Some(item)) => hazards_reply(item),
            (Intent::Tips, Some(item)) => tips_reply(item),
            (Intent::Identify, Some(item)) => format!(
                "This item was detected as <b>{}</b>, which belongs to the category: {}.",
                item.name, item.record.category
            ),
            (Intent::ItemMention | Intent::Unknown, Some(item)) => summary_reply(item),
            (Intent::ItemMention, None) => ITEM_HINT.to_string(),
            (_, None) => FALLBACK.to_string(),
        };

        tracing::debug!(
            intent = intent.as_str(),
            has_context = item.is_some(),
            "chat reply selected"
        );
        Reply {
            intent,
            text,
            has_context: item.is_some(),
        }
    }

    /// Context is usable only when the last class is known to the knowledge base.
    fn resolve_item(&self, context: &ChatContext) -> Option<Item<'_>> {
        let class = context.last_class()?;
        let record = self.kb.get(class)?;
        let name = context
            .last_name()
            .map(escape_html)
            .or_else(|| record.display_name.clone())
            .unwrap_or_else(|| escape_html(class));
        Some(Item { name, record })
    }
}

fn disposal_reply(item: &Item<'_>) -> String {
    let mut out = format!(
        "For <b>{}</b>, you should dispose of it as follows:<br>{}",
        item.name,
        steps_list(&item.record.disposal_steps)
    );
    if !item.record.hazards.is_empty() {
        out.push_str(&format!("<br><b>Hazards:</b> {}", item.record.hazards));
    }
    if !item.record.tips.is_empty() {
        out.push_str(&format!("<br><b>Tips:</b> {}", item.record.tips));
    }
    out
}

fn greeting_reply(name: &str) -> String {
    format!(
        "Hello! 😊 I recently detected <b>{name}</b>. You can ask me how to dispose of it safely or any \
         e-waste question."
    )
}

fn hazards_reply(item: &Item<'_>) -> String {
    let mut out = format!("<b>{}</b> is considered e-waste. ", item.name);
    if !item.record.hazards.is_empty() {
        out.push_str(&format!("Main hazards: {} ", item.record.hazards));
    }
    out.push_str("So please do not throw it in the normal dustbin. Use an authorised e-waste centre.");
    out
}

fn tips_reply(item: &Item<'_>) -> String {
    if item.record.tips.is_empty() {
        return format!(
            "I don't have extra tips for <b>{}</b>. Follow the disposal steps and hand it to an authorised \
             e-waste recycler.",
            item.name
        );
    }
    format!("<b>Tips for {}:</b> {}", item.name, item.record.tips)
}

fn summary_reply(item: &Item<'_>) -> String {
    let steps: Vec<String> = item
        .record
        .disposal_steps
        .iter()
        .take(SUMMARY_STEPS)
        .cloned()
        .collect();
    format!(
        "You are asking about <b>{}</b>. Here is a short summary of how to dispose of it:<br>{}",
        item.name,
        steps_list(&steps)
    )
}

fn steps_list(steps: &[String]) -> String {
    let items: String = steps.iter().map(|s| format!("<li>{s}</li>")).collect();
    format!("<ul>{items}</ul>")
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
