// Fixed text for the Home and Recommendations tabs.

pub const TITLE: &str = "SAKA Customer Segmentation";

pub const HOME_TEXT: &str = "\
SAKA is a market-driven company that markets and distributes an extensive \
portfolio of tires, batteries, lubricants, garage equipment & accessories \
with offices in Europe, Middle East and Africa. They cater to 300+ tire \
service centers, fleets & companies in Lebanon. In addition, offshore \
operations entail business with subsidiaries and sister companies in \
several African and MENA countries.";

pub const RECOMMENDATIONS: &str = "\
High-Value: All metrics for this segment are the highest. These customers are \
loyal, and strategies should focus on further enhancing their purchase \
satisfaction, loyalty and experience.

Medium-Value: This segment can be cost-effective to engage with. The goal is \
to boost their engagement and monetary contribution (Retail & Wholesale) \
through targeted strategies:
  - Targeted messages at studied intervals of maintenance & checkups (Retail).
  - Items from poorly performing categories offered at a discount as \
complementary promotions to their usual purchase categories (Wholesale).
  - Promotions for frequent customers (e.g. one free maintenance check every \
three visits).
This is especially relevant for retail customers, as around 10,800 \
maintenance and tire services were performed during Q1 & Q2.

Low-Value: These customers represent a low risk profile. They have brought \
limited profit and can be encouraged to refer new customers to SAKA in return \
for a discount on a service or purchase.
";
