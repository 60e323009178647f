use crate::{GenerationRequest, SEPARATOR};

/// Build the instruction prompt sent upstream for one request.
///
/// The formatting rules it asks for (`## Day X`, `### Breakfast: ...`,
/// `**Ingredients:**`, `#### Category`, `* ` bullets and the summary table)
/// are exactly the constructs [`crate::render`] recognizes.
pub fn build_prompt(request: &GenerationRequest) -> String {
    let days = request.days();
    let people = request.people();

    let exclusions = match request.exclusions() {
        Some(list) => format!(
            "\nIMPORTANT: The meal plan MUST NOT, under any circumstances, include the following ingredients: {list}."
        ),
        None => String::new(),
    };

    format!(
        r#"
You are an expert nutritionist and meal planner specializing in heart-healthy, cholesterol-lowering diets, with a focus on UK standards.

Generate a detailed meal plan for {days} days for {people} people.

The plan MUST focus on lowering cholesterol. This means:
- High in soluble fiber (oats, barley, beans, lentils, fruits, vegetables).
- Rich in healthy unsaturated fats (avocados, nuts, seeds, olive oil).
- Includes plant-based proteins.
- Minimizes saturated fats, trans fats, and processed foods.
- No red meat or full-fat dairy. Focus on fish, poultry, and plant proteins.
{exclusions}
- All ingredient measurements in both the meal plan and the shopping list MUST be in UK standard metric units (e.g., grams, kilograms, millilitres, litres). Common household measures like tablespoons (tbsp) and teaspoons (tsp) are also acceptable.

Provide the output in two distinct sections separated by '{SEPARATOR}'.

SECTION 1: MEAL PLAN
- First, provide a summary table of the entire meal plan. The table must be in markdown format with columns: | Day | Breakfast | Lunch | Dinner |.
- After the summary table, detail the daily plan.
- Format each day with a '## Day X' heading.
- For each day, provide sections for '### Breakfast: [Meal Name]', '### Lunch: [Meal Name]', and '### Dinner: [Meal Name]'. You must include a descriptive meal name after the meal type.
- For each meal, list the ingredients under a '**Ingredients:**' subheading. Quantities MUST be adjusted for {people} people.
- Provide clear, step-by-step cooking instructions under a '**Instructions:**' subheading.

SECTION 2: SHOPPING LIST
- After the separator, create a consolidated shopping list for all ingredients needed for the entire plan.
- The list should be categorized for easy shopping at a store like Tesco (e.g., '#### Fresh Produce', '#### Proteins', '#### Dairy & Alternatives', '#### Pantry Staples', '#### Spices & Oils').
- Use markdown bullet points ('* ') for each list item.
- Ensure shopping list quantities also use UK metric units (e.g., 500g bag of oats, 1 litre carton of oat milk).

Begin the response now.
"#
    )
}
