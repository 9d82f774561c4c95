use std::collections::HashMap;

use crate::category::BusinessType;
use crate::error::{OutreachError, Result};

pub type Fields = HashMap<&'static str, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Template {
    pub subject: &'static str,
    pub body: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
    pub subject: String,
    pub body: String,
}

/// Looks up the static template for a business type key such as `"bakery"`.
pub fn lookup(key: &str) -> Result<&'static Template> {
    BusinessType::from_key(key)
        .map(BusinessType::template)
        .ok_or_else(|| OutreachError::UnknownCategory(key.to_string()))
}

impl BusinessType {
    pub fn template(self) -> &'static Template {
        match self {
            BusinessType::CoffeeRoaster => &COFFEE_ROASTER,
            BusinessType::Bakery => &BAKERY,
            BusinessType::Florist => &FLORIST,
            BusinessType::Brewery => &BREWERY,
            BusinessType::TeaShop => &TEA_SHOP,
            BusinessType::ChocolateMaker => &CHOCOLATE_MAKER,
        }
    }
}

/// Fills every `{name}` placeholder in subject and body. Fails without output
/// if any placeholder lacks a value.
pub fn render(template: &Template, fields: &Fields) -> Result<RenderedEmail> {
    let subject = substitute(template.subject, fields)?;
    let body = substitute(template.body, fields)?;
    Ok(RenderedEmail { subject, body })
}

fn substitute(text: &str, fields: &Fields) -> Result<String> {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        match placeholder_name(after) {
            Some(name) => {
                let value = fields
                    .get(name)
                    .ok_or_else(|| OutreachError::MissingField(name.to_string()))?;
                out.push_str(value);
                rest = &after[name.len() + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    Ok(out)
}

fn placeholder_name(text: &str) -> Option<&str> {
    let end = text.find('}')?;
    let name = &text[..end];
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
    valid.then_some(name)
}

/// Intelligence-driven pitch used by default for every business type.
pub const PITCH: Template = Template {
    subject: "{subject_line}",
    body: "Hi {business_name},

{personalized_opening}

I'm {sender_name}, founder of Outbound - a platform where people book behind-the-scenes experiences at local businesses.

{revenue_hook}.

Want to see how? I created a personalized revenue calculator just for {business_name}:
\u{1F449} {landing_url}

Takes 2 minutes to see your specific setup analysis and projected earnings.

Many similar businesses are already earning {monthly_revenue}/month - they love the effortless additional income while sharing their craft.

Best,
{sender_name}
Founder, Outbound
{sender_email}
{sender_phone}",
};

const COFFEE_ROASTER: Template = Template {
    subject: "Partnership opportunity: Outbound platform launch",
    body: "Hi {business_name} team,

I'm {sender_name}, founder of Outbound - a new platform where people can book real, behind-the-scenes experiences at local businesses.

Coffee lovers are endlessly curious about roasting. They want to watch the beans transform, smell the aromas, see the timing and precision that goes into each batch. But they rarely get the chance to just... observe.

Here's what I'm building: Coffee enthusiasts book 1-hour slots to quietly watch your roasting process during regular operations. Think of it as \"behind-the-scenes access\" rather than formal instruction.

You pick a one-hour slot (say 10-11 AM or any quiet time). A paying guest books that time to observe your team at work - safely from a designated area. You earn around $40 per hour for hosting, and we handle scheduling, payment, and promotion.

It's simple: they watch, you work normally. No teaching required, no disruption to your process. Just pure curiosity being satisfied.

Many small business owners are already joining Outbound - they see it as an effortless way to create additional income while connecting people with experiences they'd never normally access.

Would you be open to a quick 10-minute chat this week?

Best regards,
{sender_name}
Founder, Outbound
{sender_email}
{sender_phone}",
};

const BAKERY: Template = Template {
    subject: "Outbound platform - early partner invitation",
    body: "Hi {business_name},

I'm {sender_name}, founder of Outbound - a platform where people can book behind-the-scenes experiences at local businesses.

Baking enthusiasts are fascinated by your process. They want to watch dough transform, see timing techniques, observe the craft that creates those perfect loaves. But they rarely get to just... watch.

Here's the concept: Food lovers book 1-hour slots to quietly observe your baking during regular operations. No instruction needed - just pure curiosity about how artisan bread comes to life.

You pick a one-hour slot (maybe during morning prep or afternoon baking). A paying guest books that time to observe your work - safely from a designated area. You earn around $45 per hour, and we handle all scheduling and payments.

Simple: they watch, you bake normally. No teaching, no disruption to your workflow. Just satisfying people's genuine curiosity about your craft.

Many bakeries are already joining - they love earning extra revenue while sharing what they're passionate about, without any additional effort.

Would you be open to a 10-minute chat this week?

Warm regards,
{sender_name}
Founder, Outbound
{sender_email}
{sender_phone}",
};

const FLORIST: Template = Template {
    subject: "Behind-the-scenes experiences platform - invitation",
    body: "Hi {business_name},

I'm {sender_name}, founder of Outbound - a platform where people book behind-the-scenes experiences at local businesses.

Flower arrangement is endlessly fascinating to watch. People are curious about color choices, stem techniques, how you build those stunning compositions. But they rarely get to just... observe the process.

Here's what I'm building: Flower enthusiasts book 1-hour slots to quietly watch you create arrangements during your regular work. No instruction - just pure observation of your creative process.

You pick a one-hour slot (maybe during prep time or custom orders). A paying guest books that time to observe your creative process - from a designated area. You earn around $40 per hour, and we handle scheduling and payments.

It's that simple: they watch, you arrange normally. No teaching required, no change to your workflow. Just people satisfying their curiosity about floral artistry.

Many florists are already joining Outbound - they see it as effortless additional income while sharing their passion with people who genuinely appreciate the craft.

Would you be open to a quick 10-minute chat this week?

Best,
{sender_name}
Founder, Outbound
{sender_email}
{sender_phone}",
};

const BREWERY: Template = Template {
    subject: "Partnership opportunity: Outbound experiences platform",
    body: "Hi {business_name},

I'm {sender_name}, founder of Outbound - a platform where people book behind-the-scenes experiences at local businesses.

Beer enthusiasts are endlessly curious about brewing. They want to watch the mashing, see fermentation in action, observe the precise timing that creates great beer. But beyond formal tours, they rarely get to just... watch.

Here's the concept: Beer lovers book 1-hour slots to quietly observe your brewing process during regular operations. Think of it as \"behind-the-scenes access\" rather than formal instruction.

You pick a one-hour slot (maybe during brewing prep or active brewing). A paying guest books that time to observe your work - safely from a designated area. You earn around $45 per hour, and we handle scheduling and payments.

Simple: they watch, you brew normally. No formal presentation needed, no change to your process. Just satisfying genuine curiosity about craft brewing.

Many breweries are already joining Outbound - they love earning additional revenue while sharing their passion with people who truly appreciate the craft.

Would you be open to a 10-minute chat this week?

Cheers,
{sender_name}
Founder, Outbound
{sender_email}
{sender_phone}",
};

const TEA_SHOP: Template = Template {
    subject: "Early invitation: Outbound platform launch",
    body: "Hi {business_name},

I'm {sender_name}, founder of Outbound - a platform where people book behind-the-scenes experiences at local businesses.

Tea preparation is naturally meditative to watch. People are curious about steeping techniques, blending processes, the mindful ritual of creating the perfect cup. But they rarely get to just... observe.

Here's what I'm building: Tea enthusiasts book 1-hour slots to quietly watch your tea preparation during regular operations. No instruction needed - just pure observation of your craft.

You pick a one-hour slot (maybe during blend creation or ceremony prep). A paying guest books that time to observe your process - from a designated quiet area. You earn around $40 per hour, and we handle scheduling and payments.

It's simple: they watch, you prepare normally. No teaching required, no disruption to your workflow. Just people satisfying their curiosity about tea artistry.

Many tea shops are already joining Outbound - they see it as effortless additional income while sharing the meditative beauty of their craft.

Would you be open to a 10-minute chat this week?

With gratitude,
{sender_name}
Founder, Outbound
{sender_email}
{sender_phone}",
};

const CHOCOLATE_MAKER: Template = Template {
    subject: "Artisan business partnership - Outbound platform",
    body: "Hi {business_name},

I'm {sender_name}, founder of Outbound - a platform where people book behind-the-scenes experiences at local businesses.

Chocolate lovers are fascinated by bean-to-bar transformation. They want to watch beans roasting, see grinding techniques, observe the magic that turns cacao into chocolate. But they rarely get to just... watch.

Here's the concept: Chocolate enthusiasts book 1-hour slots to quietly observe your chocolate making during regular operations. No instruction needed - just pure observation of your craft.

You pick a one-hour slot (maybe during roasting or tempering). A paying guest books that time to observe your process - safely from a designated area. You earn around $45 per hour, and we handle scheduling and payments.

Simple: they watch, you create normally. No teaching required, no disruption to your production. Just satisfying people's genuine curiosity about artisan chocolate making.

Many chocolate makers are already joining Outbound - they love earning additional revenue while sharing their passion with people who truly appreciate the craft.

Would you be open to a 10-minute chat this week?

Best regards,
{sender_name}
Founder, Outbound
{sender_email}
{sender_phone}",
};

#[cfg(test)]
mod tests {
    use super::*;

    fn sender_fields(business_name: &str) -> Fields {
        let mut fields = Fields::new();
        fields.insert("business_name", business_name.to_string());
        fields.insert("sender_name", "Jordan".to_string());
        fields.insert("sender_email", "jordan@outbound.com".to_string());
        fields.insert("sender_phone", "+1 (555) 010-0000".to_string());
        fields
    }

    #[test]
    fn every_category_template_renders_with_sender_fields() {
        for kind in BusinessType::ALL {
            let template = lookup(kind.key()).unwrap();
            let email = render(template, &sender_fields("Tartine Bakery")).unwrap();
            assert!(email.body.contains("Tartine Bakery"));
            assert!(email.body.ends_with("+1 (555) 010-0000"));
            assert!(!email.body.contains('{'));
        }
    }

    #[test]
    fn unknown_key_is_rejected() {
        let err = lookup("pottery_studio").unwrap_err();
        assert!(matches!(err, OutreachError::UnknownCategory(key) if key == "pottery_studio"));
    }

    #[test]
    fn missing_field_fails_the_whole_render() {
        let mut fields = sender_fields("Blue Bottle Coffee");
        fields.remove("sender_phone");

        let err = render(BusinessType::CoffeeRoaster.template(), &fields).unwrap_err();
        assert!(matches!(err, OutreachError::MissingField(name) if name == "sender_phone"));
    }

    #[test]
    fn missing_subject_field_fails_even_when_body_resolves() {
        let template = Template {
            subject: "{subject_line}",
            body: "Hi {business_name}",
        };
        let err = render(&template, &sender_fields("Dandelion")).unwrap_err();
        assert!(matches!(err, OutreachError::MissingField(name) if name == "subject_line"));
    }

    #[test]
    fn non_placeholder_braces_are_kept() {
        let template = Template {
            subject: "{ not a field } for {business_name}",
            body: "{}{business_name}{",
        };
        let email = render(&template, &sender_fields("Acme")).unwrap();
        assert_eq!(email.subject, "{ not a field } for Acme");
        assert_eq!(email.body, "{}Acme{");
    }
}
