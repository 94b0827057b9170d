use crate::errors::PerfError;
use crate::llm::types::Message;
use crate::models::Finding;

/// System instructions for turning one audit finding into a developer ticket.
pub const TICKET_SYSTEM_PROMPT: &str = "Act as Solution Architect in Performance testing. \
Please imagine that you need to generate a ticket for developers. Ticket must contains only  \
Ticket title, Ticket description, Ticket suggestions. Nothing else must not be included in the \
ticket. Ticket title must be informative, understandable. Ticket title must contain the next \
value from json file: displayValue. Ticket description must be constructed from the items \
specified in the json. First 10 item with data from headings (if there is) from json should be \
included as separate action items into the Ticket description. All action item should have \
description based on the numbers in json file. Ticket description must contain the concrete \
actions of what must be done based on the provided json. Description must contain information \
which you can be rephrased that the main focus is to optimize performance, make detailed \
analysis of findings and perform actions for optimization. Ticket suggestions must contain the \
concrete recommendations based on provided json. These recommendations must correlate with the \
description and title. Estimated impact must be focused on performance, finances and Revenue \
increase outcomes. Please generate the ticket using the requirements above and based on the \
json below.";

/// System instructions for turning a ticket into a bare number of hours.
pub const ESTIMATE_SYSTEM_PROMPT: &str = "Please estimate the created ticket in number of \
working days that require  for analysis and performing action items in the ticket. Team which \
work with ticket is one lead JS developer.  Take in account for estimations application \
complexity 8 from 10. Your reply must contain only number of total calculated estimations in \
working hours without and nothing else.";

/// Messages for the ticket-generation call. The finding travels as a second
/// system message holding its JSON form.
pub fn ticket_messages(finding: &Finding) -> Result<Vec<Message>, PerfError> {
    let serialized = serde_json::to_string(finding)?;
    Ok(vec![
        Message::system(TICKET_SYSTEM_PROMPT),
        Message::system(&serialized),
    ])
}

/// Messages for the estimation call. The ticket text is the only user content.
pub fn estimate_messages(ticket_text: &str) -> Vec<Message> {
    vec![
        Message::system(ESTIMATE_SYSTEM_PROMPT),
        Message::user(ticket_text),
    ]
}
